// Load-once, read-many index of one vmrest collection
use crate::display::{sort_by_display, Selectable};
use crate::error::{CacheError, DisplayError};
use crate::result::WebCallResult;
use crate::transport::ConnectionServer;
use crate::xml::{error_details_message, FieldMap};
use serde::Serialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub trait Resource: FieldMap + Clone {
    type Key: Eq + Hash + Clone + Display;

    // Used in log lines and error text
    const RESOURCE_NAME: &'static str;
    // Tag of each collection child, e.g. `TimeZone`
    const ELEMENT_NAME: &'static str;
    // Path below the API root
    const COLLECTION_PATH: &'static str;

    fn key(&self) -> Self::Key;
}

pub type MissHook = Arc<dyn Fn(&str) + Send + Sync>;

// Read-only after load, so shared readers need no lock
pub struct ResourceCache<E: Resource> {
    entries: HashMap<E::Key, E>,
    source_url: String,
    miss_hook: Option<MissHook>,
}

impl<E: Resource> ResourceCache<E> {
    pub fn load(server: &ConnectionServer) -> Result<Self, CacheError> {
        Self::load_at(server, E::COLLECTION_PATH)
    }

    // For collections nested under a parent object
    pub fn load_at(server: &ConnectionServer, path: &str) -> Result<Self, CacheError> {
        if !server.is_valid() {
            warn!("Refusing to load {}: server handle not configured", E::RESOURCE_NAME);
            return Err(CacheError::InvalidServer {
                resource: E::RESOURCE_NAME,
                reason: "server name is empty".to_string(),
            });
        }

        let result = server.get(path);
        let url = if result.url.is_empty() {
            server.url_for(path)
        } else {
            result.url.clone()
        };

        let entries = Self::index_response(result, &url).map_err(|e| {
            warn!("Loading {} failed: {}", E::RESOURCE_NAME, e);
            e
        })?;

        info!("Loaded {} {} entries from {}", entries.len(), E::RESOURCE_NAME, url);

        Ok(Self {
            entries,
            source_url: url,
            miss_hook: None,
        })
    }

    fn index_response(result: WebCallResult, url: &str) -> Result<HashMap<E::Key, E>, CacheError> {
        if !result.success {
            return Err(CacheError::Transport {
                resource: E::RESOURCE_NAME,
                url: url.to_string(),
                message: result.error_text,
            });
        }

        let root = match result.payload {
            Some(root) if root.has_children() => root,
            _ => {
                return Err(CacheError::EmptyResponse {
                    resource: E::RESOURCE_NAME,
                    url: url.to_string(),
                })
            }
        };

        // Some servers answer 200 with an error body
        if let Some(detail) = error_details_message(&root) {
            return Err(CacheError::UnexpectedShape {
                resource: E::RESOURCE_NAME,
                url: url.to_string(),
                detail,
            });
        }

        let mut entries = HashMap::with_capacity(root.children.len());
        for element in &root.children {
            if element.name != E::ELEMENT_NAME {
                return Err(CacheError::UnexpectedShape {
                    resource: E::RESOURCE_NAME,
                    url: url.to_string(),
                    detail: format!("expected <{}>, found <{}>", E::ELEMENT_NAME, element.name),
                });
            }
            let entity = E::from_element(element);
            match entries.entry(entity.key()) {
                Entry::Occupied(occupied) => {
                    return Err(CacheError::DuplicateKey {
                        resource: E::RESOURCE_NAME,
                        key: occupied.key().to_string(),
                        url: url.to_string(),
                    });
                }
                Entry::Vacant(vacant) => {
                    vacant.insert(entity);
                }
            }
        }

        Ok(entries)
    }

    pub fn with_miss_hook(mut self, hook: MissHook) -> Self {
        self.miss_hook = Some(hook);
        self
    }

    // A miss returns the default entity alongside a failed result
    pub fn get(&self, key: &E::Key) -> (E, WebCallResult) {
        match self.entries.get(key) {
            Some(entity) => (entity.clone(), WebCallResult::ok().at_url(&self.source_url)),
            None => {
                let key_text = key.to_string();
                debug!("{} not found: {}", E::RESOURCE_NAME, key_text);
                if let Some(hook) = &self.miss_hook {
                    hook(&key_text);
                }
                let result = WebCallResult::failure(format!(
                    "{} not found for key: {}",
                    E::RESOURCE_NAME,
                    key_text
                ))
                .at_url(&self.source_url);
                (E::default(), result)
            }
        }
    }

    pub fn get_ref(&self, key: &E::Key) -> Option<&E> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &E::Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &E::Key> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }
}

impl<E: Resource + Selectable> ResourceCache<E> {
    pub fn sorted_for_display(&self) -> Result<Vec<E>, DisplayError> {
        let mut items: Vec<E> = self.entries.values().cloned().collect();
        sort_by_display(&mut items)?;
        Ok(items)
    }
}

impl<E: Resource + Serialize> ResourceCache<E> {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let items: Vec<&E> = self.entries.values().collect();
        serde_json::to_string_pretty(&items)
    }
}

impl<E: Resource> std::fmt::Debug for ResourceCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("resource", &E::RESOURCE_NAME)
            .field("source_url", &self.source_url)
            .field("len", &self.entries.len())
            .field("miss_hook", &self.miss_hook.is_some())
            .finish()
    }
}
