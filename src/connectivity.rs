use crate::api::Backend;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connectivity {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl Connectivity {
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Unknown => "Checking...",
            Connectivity::Connected => "Connected",
            Connectivity::Disconnected => "Disconnected",
        }
    }
}

/// One liveness probe. No retries; the caller re-probes on its interval.
pub async fn probe<B: Backend>(backend: &B) -> Connectivity {
    match backend.ping().await {
        Ok(()) => Connectivity::Connected,
        Err(err) => {
            tracing::debug!(%err, "backend probe failed");
            Connectivity::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::test_support::FakeBackend;

    #[tokio::test]
    async fn reachable_backend_is_connected() {
        let backend = FakeBackend::default();
        assert_eq!(probe(&backend).await, Connectivity::Connected);
    }

    #[tokio::test]
    async fn error_status_counts_as_disconnected() {
        let backend = FakeBackend::default();
        backend.set_ping(Err(ApiError::Status { status: 503, detail: None }));
        assert_eq!(probe(&backend).await, Connectivity::Disconnected);

        backend.set_ping(Err(ApiError::Network("refused".into())));
        assert_eq!(probe(&backend).await, Connectivity::Disconnected);
    }
}
