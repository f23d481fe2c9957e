//! Page-data loading that never fails the page
//!
//! Each resource is fetched, status-checked and parsed on its own. Any
//! failure (transport, non-2xx status, malformed body) degrades that resource
//! to its empty default and records a diagnostic; siblings are unaffected.
//! Parsed payloads are kept as plain JSON values, so whatever shape the
//! backend sends reaches the page untouched.
//! Multi-resource pages issue their fetches concurrently on the current task.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::backend::BackendClient;

/// A resource value plus the reason it fell back to its default, if it did
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub data: T,
    pub error: Option<String>,
}

impl<T: Default> Loaded<T> {
    fn fallback(error: String) -> Self {
        Self {
            data: T::default(),
            error: Some(error),
        }
    }
}

/// Data for the clients page
#[derive(Debug, Clone, Serialize)]
pub struct ClientsPage {
    pub clientes: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Data for the services page
#[derive(Debug, Clone, Serialize)]
pub struct ServicesPage {
    pub servicos: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Data for the appointments page
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentsPage {
    pub agendamentos: Vec<Value>,
    pub clientes: Vec<Value>,
    pub servicos: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Loads page data from the backend with per-resource fallbacks
#[derive(Debug, Clone)]
pub struct Loader {
    backend: BackendClient,
}

impl Loader {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }

    /// Fetch `path` and parse it as `T`, substituting `T::default()` on any failure.
    pub async fn fetch_or_default<T>(&self, resource: &str, path: &str) -> Loaded<T>
    where
        T: DeserializeOwned + Default,
    {
        let response = match self.backend.get(path).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", resource, e);
                return Loaded::fallback(format!("failed to load {}: backend unreachable", resource));
            }
        };

        if !response.is_success() {
            tracing::warn!(
                "Failed to load {}: backend returned status {}",
                resource,
                response.status
            );
            return Loaded::fallback(format!(
                "failed to load {}: status {}",
                resource, response.status
            ));
        }

        match serde_json::from_slice::<T>(&response.body) {
            Ok(data) => Loaded { data, error: None },
            Err(e) => {
                tracing::error!("Malformed JSON in {} response: {}", resource, e);
                Loaded::fallback(format!("failed to load {}: malformed response", resource))
            }
        }
    }

    pub async fn clients_page(&self) -> ClientsPage {
        let clientes = self.fetch_or_default("clientes", "/clientes").await;
        ClientsPage {
            clientes: clientes.data,
            error: clientes.error,
        }
    }

    pub async fn services_page(&self) -> ServicesPage {
        let servicos = self.fetch_or_default("servicos", "/servicos").await;
        ServicesPage {
            servicos: servicos.data,
            error: servicos.error,
        }
    }

    /// Three independent fetches awaited together; fields map to resources by position.
    pub async fn appointments_page(&self) -> AppointmentsPage {
        let (agendamentos, clientes, servicos) = tokio::join!(
            self.fetch_or_default::<Vec<Value>>("agendamentos", "/agendamentos"),
            self.fetch_or_default::<Vec<Value>>("clientes", "/clientes"),
            self.fetch_or_default::<Vec<Value>>("servicos", "/servicos"),
        );

        let error = join_errors([
            agendamentos.error.as_deref(),
            clientes.error.as_deref(),
            servicos.error.as_deref(),
        ]);

        AppointmentsPage {
            agendamentos: agendamentos.data,
            clientes: clientes.data,
            servicos: servicos.data,
            error,
        }
    }
}

fn join_errors<'a>(errors: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
    let joined: Vec<&str> = errors.into_iter().flatten().collect();
    if joined.is_empty() {
        None
    } else {
        Some(joined.join("; "))
    }
}
