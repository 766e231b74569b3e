use portfolio_core_health_contracts::HealthStatus;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiHealthStatus {
    /// Always `true`, since the http server answered.
    pub http: bool,
    pub email: bool,
}

impl From<HealthStatus> for ApiHealthStatus {
    fn from(value: HealthStatus) -> Self {
        Self {
            http: true,
            email: value.email,
        }
    }
}
