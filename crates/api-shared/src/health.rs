use crate::dto::HealthRes;

/// Simple health service shared by the REST API and the binaries.
///
/// This service provides a standardised way to check the health status of the ward dashboard.
#[derive(Clone, Debug, Default)]
pub struct HealthService;

impl HealthService {
    /// Static health check; the preferred entry point as it needs no instance.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "UTI dashboard is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_alive() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "UTI dashboard is alive");
    }
}
