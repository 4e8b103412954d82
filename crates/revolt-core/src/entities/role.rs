//! Role entity - a named permission set inside a server

use serde::{Deserialize, Serialize};

use crate::value_objects::PartialField;

/// Allow/deny permission pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionOverride {
    /// Allowed bits
    pub a: u64,
    /// Denied bits
    pub d: u64,
}

impl PermissionOverride {
    /// Apply this override on top of a base permission set
    #[must_use]
    pub fn apply(self, base: u64) -> u64 {
        (base | self.a) & !self.d
    }
}

/// Role entity, owned by its server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerRole {
    pub name: String,
    pub permissions: PermissionOverride,
    pub colour: Option<String>,
    pub hoist: bool,
    /// Lower ranks sit higher in the hierarchy
    pub rank: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialServerRole {
    pub name: Option<String>,
    pub permissions: Option<PermissionOverride>,
    pub colour: Option<String>,
    pub hoist: Option<bool>,
    pub rank: Option<i64>,
}

field_enum! {
    /// Role fields that an update may clear
    RoleField("role") {
        Colour => "Colour",
    }
}

impl ServerRole {
    pub fn apply_update(&mut self, data: PartialServerRole, clear: &[RoleField]) {
        PartialField::from(data.name).apply_to(&mut self.name);
        PartialField::from(data.permissions).apply_to(&mut self.permissions);
        PartialField::from_optional(data.colour, clear.contains(&RoleField::Colour))
            .apply_to(&mut self.colour);
        PartialField::from(data.hoist).apply_to(&mut self.hoist);
        PartialField::from(data.rank).apply_to(&mut self.rank);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_override() {
        let over = PermissionOverride { a: 0b0100, d: 0b0001 };
        assert_eq!(over.apply(0b0011), 0b0110);
    }

    #[test]
    fn test_role_clear_colour() {
        let mut role = ServerRole {
            name: "Mods".to_string(),
            colour: Some("#ff0000".to_string()),
            rank: 2,
            ..Default::default()
        };

        let data = PartialServerRole {
            colour: Some("#00ff00".to_string()),
            hoist: Some(true),
            ..Default::default()
        };
        role.apply_update(data, &[RoleField::Colour]);

        assert!(role.colour.is_none());
        assert!(role.hoist);
        assert_eq!(role.rank, 2);
    }
}
