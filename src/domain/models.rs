pub const DEFAULT_STATUS: &str = "available";
pub const DEFAULT_POWER_KW: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct StationRecord {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub status: String,
    pub power_kw: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewStationRecord {
    pub name: String,
    pub location: String,
    pub status: String,
    pub power_kw: f64,
}

/// A partial update. `None` means the field was not present in the request
/// and must keep its stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationPatch {
    pub name: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub power_kw: Option<f64>,
}

impl StationPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.location.is_none()
            && self.status.is_none()
            && self.power_kw.is_none()
    }
}
