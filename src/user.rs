//! The signed-in user, as far as the support screens care about it.

use serde::{Deserialize, Serialize};

/// An application of the platform; tickets are categorized by app address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub address: String,
}

/// An institution a user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,

    /// Schools this user is local administrator of
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub admin_schools: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apps: Vec<App>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schools: Vec<School>,
}

impl UserContext {
    /// Does the user administer the given school?
    pub fn is_local_admin_of(&self, school_id: &str) -> bool {
        self.admin_schools.iter().any(|s| s == school_id)
    }

    pub fn is_local_admin(&self) -> bool {
        !self.admin_schools.is_empty()
    }

    pub fn app_name(&self, address: &str) -> Option<&str> {
        self.apps
            .iter()
            .find(|app| app.address == address)
            .map(|app| app.name.as_str())
    }

    pub fn school_name(&self, school_id: &str) -> Option<&str> {
        self.schools
            .iter()
            .find(|school| school.id == school_id)
            .map(|school| school.name.as_str())
    }

    /// Applications ordered by name, as offered in the category picker.
    pub fn sorted_apps(&self) -> Vec<&App> {
        let mut apps: Vec<&App> = self.apps.iter().collect();
        apps.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        apps
    }
}
