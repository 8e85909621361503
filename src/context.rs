//! Request Context
//!
//! Caller identity passed explicitly into the command layer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Authenticated user performing the request
    pub actor: Option<String>,
    /// Correlation id from the surrounding request
    pub request_id: Option<String>,
}

impl RequestContext {
    /// Context for work not triggered by a user
    pub fn system() -> Self {
        Self::default()
    }

    pub fn for_actor(actor: impl Into<String>) -> Self {
        Self {
            actor: Some(actor.into()),
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Prefix for log lines
    pub fn label(&self) -> String {
        let actor = self.actor.as_deref().unwrap_or("system");
        match &self.request_id {
            Some(id) => format!("{} [{}]", actor, id),
            None => actor.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(RequestContext::system().label(), "system");
        assert_eq!(
            RequestContext::for_actor("owner").with_request_id("r-1").label(),
            "owner [r-1]"
        );
    }
}
