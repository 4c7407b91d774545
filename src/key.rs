//! Key-naming scheme shared by every component.
//!
//! The layout must stay bit-exact so the crate interoperates with data
//! already sitting in the store:
//!
//! ```text
//! <Owner>.<method>            call counter
//! <Owner>.<method>:inputs     input history list
//! <Owner>.<method>:outputs    output history list
//! count:<arg>                 fetch-cache access counter
//! result:<arg>                fetch-cache entry
//! <uuid-v4>                   opaque stored-value key
//! ```

use uuid::Uuid;

/// Separator between owning type and method in an operation identity.
pub const IDENTITY_SEPARATOR: &str = ".";

/// Build the stable identity string for an operation.
///
/// Identical operations always map to the same identity; distinct
/// operations never collide as long as `(owner, method)` pairs differ.
pub fn identity(owner: &str, method: &str) -> String {
    format!("{}{}{}", owner, IDENTITY_SEPARATOR, method)
}

/// Key of the ordered input-history list for an operation.
pub fn inputs_key(identity: &str) -> String {
    format!("{}:inputs", identity)
}

/// Key of the ordered output-history list for an operation.
pub fn outputs_key(identity: &str) -> String {
    format!("{}:outputs", identity)
}

/// Access-counter key for a fetch-cache argument.
pub fn count_key(arg: &str) -> String {
    format!("count:{}", arg)
}

/// Cache-entry key for a fetch-cache argument.
pub fn result_key(arg: &str) -> String {
    format!("result:{}", arg)
}

/// Generate a fresh opaque key for a stored value.
///
/// Keys are independent of value content; collision probability is treated
/// as negligible, so records written under them are never overwritten.
pub fn fresh_key() -> String {
    Uuid::new_v4().to_string()
}
