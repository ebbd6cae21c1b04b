//! Entry-point registration.
//!
//! The exported routines are described once in [`ENTRY_POINTS`], bound to
//! native function pointers in a `static` [`CallTable`], and handed to the
//! host exactly once when the module is loaded. The table is never mutated
//! afterwards, so no locking is involved.

pub mod table;

pub use table::{CallMethodDef, CallTable, DlFunc, EntryPoint};

use tracing::debug;

/// `c_llc_f(x, l, a)`: vector plus two scalar parameters.
pub const LLC_F: EntryPoint = EntryPoint {
    name: c"c_llc_f",
    arity: 3,
};

/// `c_add_f(a, b)`: two scalars.
pub const ADD_F: EntryPoint = EntryPoint {
    name: c"c_add_f",
    arity: 2,
};

/// Every routine the module exports, in registration order.
pub const ENTRY_POINTS: [EntryPoint; 2] = [LLC_F, ADD_F];

/// How the module registers itself with the host loader.
#[derive(Clone, Debug)]
pub struct RegistrationConfig {
    /// Keep the host's fallback lookup of unregistered symbols by name.
    pub dynamic_symbols: bool,
    /// Only allow calls through registered symbol objects, not strings.
    pub force_symbols: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            dynamic_symbols: true,
            force_symbols: false,
        }
    }
}

/// The host loader's registration facility.
pub trait Registrar {
    /// Hand a null-terminated routine table to the host.
    fn register_call_routines(&mut self, table: &'static [CallMethodDef]);

    /// Toggle lookup of symbols that were not registered.
    fn use_dynamic_symbols(&mut self, enabled: bool);

    /// Toggle whether routines may only be called via symbol objects.
    fn force_symbols(&mut self, enabled: bool);
}

/// Register `table` with the host, then apply `config`.
///
/// With the default configuration only the table registration reaches the
/// host.
pub fn register_entry_points<R, const N: usize>(
    registrar: &mut R,
    table: &'static CallTable<N>,
    config: &RegistrationConfig,
) where
    R: Registrar + ?Sized,
{
    for row in table.entries() {
        debug!(
            name = ?row.name(),
            arity = row.arity(),
            "registering call routine"
        );
    }

    registrar.register_call_routines(table.as_slice());

    if !config.dynamic_symbols {
        registrar.use_dynamic_symbols(false);
    }
    if config.force_symbols {
        registrar.force_symbols(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libc::c_void;

    #[derive(Default)]
    struct RecordingRegistrar {
        tables: Vec<Vec<(String, usize, i32)>>,
        dynamic_symbols: Option<bool>,
        force_symbols: Option<bool>,
    }

    impl Registrar for RecordingRegistrar {
        fn register_call_routines(&mut self, table: &'static [CallMethodDef]) {
            // Walk the raw rows up to the terminator, as the host loader does.
            let mut rows = Vec::new();
            let mut ptr = table.as_ptr();
            unsafe {
                while !(*ptr).is_end() {
                    let row = &*ptr;
                    let name = row.name().unwrap().to_str().unwrap().to_string();
                    let fun = row.fun().unwrap() as usize;
                    rows.push((name, fun, row.arity()));
                    ptr = ptr.add(1);
                }
            }
            self.tables.push(rows);
        }

        fn use_dynamic_symbols(&mut self, enabled: bool) {
            self.dynamic_symbols = Some(enabled);
        }

        fn force_symbols(&mut self, enabled: bool) {
            self.force_symbols = Some(enabled);
        }
    }

    static LLC_TAG: u8 = 1;
    static ADD_TAG: u8 = 2;

    unsafe extern "C" fn llc() -> *mut c_void {
        &LLC_TAG as *const u8 as *mut c_void
    }

    unsafe extern "C" fn add() -> *mut c_void {
        &ADD_TAG as *const u8 as *mut c_void
    }

    static TABLE: CallTable<3> = CallTable::new([
        CallMethodDef::bind(LLC_F, llc),
        CallMethodDef::bind(ADD_F, add),
        CallMethodDef::END,
    ]);

    #[test]
    fn test_entry_points() {
        assert_eq!(LLC_F.name_str(), "c_llc_f");
        assert_eq!(LLC_F.arity, 3);
        assert_eq!(ADD_F.name_str(), "c_add_f");
        assert_eq!(ADD_F.arity, 2);
        assert_ne!(LLC_F.name, ADD_F.name);
    }

    #[test]
    fn test_register_default_config() {
        let mut registrar = RecordingRegistrar::default();
        register_entry_points(&mut registrar, &TABLE, &RegistrationConfig::default());

        assert_eq!(registrar.tables.len(), 1);
        let rows = &registrar.tables[0];
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, "c_llc_f");
        assert_eq!(rows[0].2, 3);
        assert_eq!(rows[1].0, "c_add_f");
        assert_eq!(rows[1].2, 2);
        assert_ne!(rows[0].1, rows[1].1);

        assert_eq!(registrar.dynamic_symbols, None);
        assert_eq!(registrar.force_symbols, None);
    }

    #[test]
    fn test_register_strict_config() {
        let mut registrar = RecordingRegistrar::default();
        let config = RegistrationConfig {
            dynamic_symbols: false,
            force_symbols: true,
        };
        register_entry_points(&mut registrar, &TABLE, &config);

        assert_eq!(registrar.tables.len(), 1);
        assert_eq!(registrar.dynamic_symbols, Some(false));
        assert_eq!(registrar.force_symbols, Some(true));
    }
}
