//! Origin check applied to WebSocket upgrade requests.

/// Which `Origin` header values may open a WebSocket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OriginPolicy {
    /// Permit every origin. Only suitable for trusted deployments.
    #[default]
    AnyOrigin,
    /// Permit the listed origins (case-insensitive) and requests without an
    /// `Origin` header, which are not sent by browsers.
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Build a policy from a configured allow-list; an empty list permits any origin
    pub fn from_allowed(origins: Vec<String>) -> Self {
        let origins: Vec<String> = origins
            .into_iter()
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        if origins.is_empty() {
            Self::AnyOrigin
        } else {
            Self::AllowList(origins)
        }
    }

    pub fn permits(&self, origin: Option<&str>) -> bool {
        match (self, origin) {
            (Self::AnyOrigin, _) | (Self::AllowList(_), None) => true,
            (Self::AllowList(allowed), Some(origin)) => {
                let origin = origin.trim().trim_end_matches('/');
                allowed
                    .iter()
                    .any(|candidate| candidate.eq_ignore_ascii_case(origin))
            }
        }
    }
}
