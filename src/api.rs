//! The main entry points for converting objects to and from wire
//! collections.

use crate::cache;
use crate::context::SaveContext;
use crate::error::Result;
use crate::load;
use crate::save;
use crate::schema::WireObject;
use crate::wire::WireCollection;

/// The conversion façade.
///
/// All operations are synchronous and single-threaded per call; distinct
/// objects and collections may be converted concurrently from any number
/// of threads. The only shared state is the process-wide type metadata
/// cache, which is built lazily and read lock-free once populated.
///
/// ## Examples
///
/// ```rust
/// use wiremap::{Wiremap, WireObject};
///
/// #[derive(Default, WireObject)]
/// struct Handshake {
///     #[wire(name = "TOKEN")]
///     token: String,
///     #[wire(name = "AMT", format = "0.00")]
///     amount: f64,
/// }
///
/// let order = Handshake { token: "EC-42XG".into(), amount: 12.5 };
/// let wire = Wiremap::save(&order)?;
/// assert_eq!(wire.get("TOKEN"), Some("EC-42XG"));
/// assert_eq!(wire.get("AMT"), Some("12.50"));
///
/// let back: Handshake = Wiremap::load(&wire)?;
/// assert_eq!(back.token, "EC-42XG");
/// # Ok::<(), wiremap::WiremapError>(())
/// ```
#[derive(Debug)]
pub struct Wiremap;

impl Wiremap {
    /// Saves `value` into a fresh wire collection.
    pub fn save<T: WireObject>(value: &T) -> Result<WireCollection> {
        let mut wire = WireCollection::new();
        Self::save_into(value, &mut wire)?;
        Ok(wire)
    }

    /// Saves `value` into `destination` without clearing it first; all
    /// writes are additive.
    pub fn save_into<T: WireObject>(value: &T, destination: &mut WireCollection) -> Result<()> {
        let mut cx = SaveContext::new(destination);
        save::save_object(&mut cx, value)
    }

    /// Loads a fresh `T` from `wire`. Unrecognized keys are skipped;
    /// deferred validations run once every entry is processed.
    pub fn load<T: WireObject + Default>(wire: &WireCollection) -> Result<T> {
        let mut target = T::default();
        Self::load_into(wire, &mut target)?;
        Ok(target)
    }

    /// Loads `wire` into an existing `target` without resetting it first.
    /// Fields without a corresponding entry keep their current values.
    pub fn load_into<T: WireObject>(wire: &WireCollection, target: &mut T) -> Result<()> {
        load::load_collection(wire, target)
    }

    /// Drops every cached type-metadata entry, freeing memory. Safe to
    /// call while conversions are running; they keep the entries they
    /// already fetched, and the next conversion per type rebuilds.
    pub fn clear_cache() {
        cache::clear();
    }
}
