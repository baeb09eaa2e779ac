// client/src/fetch.rs

use log::warn;
use std::future::Future;

use crate::feedback::ScreenError;

/// What a screen knows about one remote list.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loadable::Failed(m) => Some(m),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }
}

/// A named fetch slot. `load` runs a fetch and keeps either the value or the
/// failure message; the previous value is dropped when a reload starts.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    name: &'static str,
    state: Loadable<T>,
}

impl<T> Resource<T> {
    pub fn new(name: &'static str) -> Self {
        Resource { name, state: Loadable::Idle }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &Loadable<T> {
        &self.state
    }

    pub async fn load<F>(&mut self, fetch: F) -> &Loadable<T>
    where
        F: Future<Output = Result<T, ScreenError>>,
    {
        self.state = Loadable::Loading;
        self.state = match fetch.await {
            Ok(value) => Loadable::Ready(value),
            Err(e) => {
                warn!("{} failed: {} ({})", self.name, e.message, e.cause);
                Loadable::Failed(e.message)
            }
        };
        &self.state
    }

    pub fn reset(&mut self) {
        self.state = Loadable::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ApiError;

    #[tokio::test]
    async fn keeps_value_on_success() {
        let mut rooms: Resource<Vec<u32>> = Resource::new("rooms");
        assert_eq!(rooms.state(), &Loadable::Idle);
        rooms.load(async { Ok(vec![101, 102]) }).await;
        assert_eq!(rooms.state().value(), Some(&vec![101, 102]));
    }

    #[tokio::test]
    async fn keeps_message_on_failure() {
        let mut rooms: Resource<Vec<u32>> = Resource::new("rooms");
        rooms
            .load(async {
                Err(ScreenError::new(
                    "Error fetching rooms",
                    ApiError::Network("refused".into()),
                ))
            })
            .await;
        assert_eq!(rooms.state().error(), Some("Error fetching rooms"));
        assert!(rooms.state().value().is_none());

        rooms.reset();
        assert_eq!(rooms.state(), &Loadable::Idle);
    }
}
