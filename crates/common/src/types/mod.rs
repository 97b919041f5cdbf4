use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Body of the root URL: what the service is and where its resources live.
#[derive(Serialize, Debug)]
pub struct ServiceIndex {
    pub name: String,
    pub version: String,
    pub paths: String,
}

impl ServiceIndex {
    pub fn new(name: &str, version: &str, paths: &str) -> Self {
        Self { name: name.to_string(), version: version.to_string(), paths: paths.to_string() }
    }
}
