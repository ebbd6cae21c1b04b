//! End-to-end checks of the bridge against the in-memory host.

use fortloop::{
    invoke_binary_scalar, invoke_unary_scalar_with_parameters, register_entry_points,
    CallMethodDef, CallTable, Host, MemoryHost, RegistrationConfig, Registrar, RoutineSet,
    ENTRY_POINTS,
};
use libc::{c_int, c_void};
use proptest::prelude::*;
use std::cell::Cell;

thread_local! {
    static LAST_N: Cell<c_int> = const { Cell::new(-1) };
}

unsafe extern "C" fn add_f(a: *const f64, b: *const f64, ret: *mut f64) {
    *ret = *a + *b;
}

/// Stand-in for `llc_f`: records `n` and returns `sum(x) * l - a`.
unsafe extern "C" fn llc_f(x: *const f64, n: c_int, l: *const f64, a: *const f64, ret: *mut f64) {
    LAST_N.with(|last| last.set(n));
    let xs = std::slice::from_raw_parts(x, n as usize);
    *ret = xs.iter().sum::<f64>() * *l - *a;
}

fn routines() -> RoutineSet {
    RoutineSet::new(llc_f, add_f)
}

#[test]
fn add_two_and_three() {
    let host = MemoryHost::new();
    let a = host.scalar(2.0).unwrap();
    let b = host.scalar(3.0).unwrap();

    let ret = unsafe { invoke_binary_scalar(&host, routines().binary, a, b) }.unwrap();

    assert_eq!(host.length(ret).unwrap(), 1);
    assert_eq!(host.read_scalar(ret).unwrap(), 5.0);
}

#[test]
fn llc_sees_element_count() {
    let host = MemoryHost::new();
    let x = host.vector(&[1.0, 2.0, 3.0]).unwrap();
    let l = host.scalar(0.5).unwrap();
    let a = host.scalar(1.0).unwrap();

    let ret =
        unsafe { invoke_unary_scalar_with_parameters(&host, routines().unary, x, l, a) }.unwrap();

    assert_eq!(LAST_N.with(Cell::get), 3);
    assert_eq!(host.read_scalar(ret).unwrap(), 2.0);
}

#[test]
fn repeated_calls_keep_protection_balanced() {
    let host = MemoryHost::new();
    let x = host.vector(&[1.0; 16]).unwrap();
    let l = host.scalar(1.0).unwrap();
    let a = host.scalar(0.0).unwrap();
    let before = host.stats();

    for _ in 0..50 {
        unsafe {
            invoke_unary_scalar_with_parameters(&host, routines().unary, x, l, a).unwrap();
            invoke_binary_scalar(&host, routines().binary, l, a).unwrap();
        }
    }

    let after = host.stats();
    assert_eq!(after.allocations - before.allocations, 100);
    assert_eq!(after.protects - before.protects, 100);
    assert_eq!(after.unprotects - before.unprotects, 100);
    assert_eq!(after.depth, 0);
    assert_eq!(after.max_depth, 1);
    assert_eq!(after.underflows, 0);
}

#[derive(Default)]
struct Loader {
    calls: usize,
    names: Vec<(String, c_int)>,
    funs: Vec<usize>,
}

impl Registrar for Loader {
    fn register_call_routines(&mut self, table: &'static [CallMethodDef]) {
        self.calls += 1;
        self.names = table
            .iter()
            .take_while(|row| !row.is_end())
            .map(|row| (row.name().unwrap().to_string_lossy().into_owned(), row.arity()))
            .collect();
        self.funs = table
            .iter()
            .take_while(|row| !row.is_end())
            .map(|row| row.fun().unwrap() as usize)
            .collect();
    }

    fn use_dynamic_symbols(&mut self, _enabled: bool) {
        panic!("default registration must not touch dynamic symbol lookup");
    }

    fn force_symbols(&mut self, _enabled: bool) {
        panic!("default registration must not force symbols");
    }
}

static LLC_MARK: u8 = 3;
static ADD_MARK: u8 = 2;

unsafe extern "C" fn llc_entry() -> *mut c_void {
    &LLC_MARK as *const u8 as *mut c_void
}

unsafe extern "C" fn add_entry() -> *mut c_void {
    &ADD_MARK as *const u8 as *mut c_void
}

static TABLE: CallTable<3> = CallTable::new([
    CallMethodDef::bind(ENTRY_POINTS[0], llc_entry),
    CallMethodDef::bind(ENTRY_POINTS[1], add_entry),
    CallMethodDef::END,
]);

#[test]
fn registers_exactly_the_exported_names() {
    let mut loader = Loader::default();
    register_entry_points(&mut loader, &TABLE, &RegistrationConfig::default());

    assert_eq!(loader.calls, 1);
    assert_eq!(
        loader.names,
        vec![("c_llc_f".to_string(), 3), ("c_add_f".to_string(), 2)]
    );
    assert_eq!(loader.funs.len(), 2);
    assert_ne!(loader.funs[0], loader.funs[1]);
    let llc = unsafe { std::mem::transmute::<usize, fortloop::registry::DlFunc>(loader.funs[0])() };
    let add = unsafe { std::mem::transmute::<usize, fortloop::registry::DlFunc>(loader.funs[1])() };
    assert_eq!(llc as *const u8, &LLC_MARK as *const u8);
    assert_eq!(add as *const u8, &ADD_MARK as *const u8);
}

proptest! {
    #[test]
    fn binary_result_is_routine_result(a in -1e12f64..1e12, b in -1e12f64..1e12) {
        let host = MemoryHost::new();
        let ha = host.scalar(a).unwrap();
        let hb = host.scalar(b).unwrap();

        let ret = unsafe { invoke_binary_scalar(&host, routines().binary, ha, hb) }.unwrap();

        prop_assert_eq!(host.read_scalar(ret).unwrap(), a + b);
    }

    #[test]
    fn unary_receives_true_length(
        xs in prop::collection::vec(-1e6f64..1e6, 0..64),
        l in -10.0f64..10.0,
        a in -10.0f64..10.0,
    ) {
        let host = MemoryHost::new();
        let hx = host.vector(&xs).unwrap();
        let hl = host.scalar(l).unwrap();
        let ha = host.scalar(a).unwrap();

        let ret = unsafe {
            invoke_unary_scalar_with_parameters(&host, routines().unary, hx, hl, ha)
        }
        .unwrap();

        prop_assert_eq!(LAST_N.with(Cell::get), xs.len() as c_int);
        prop_assert_eq!(host.read_scalar(ret).unwrap(), xs.iter().sum::<f64>() * l - a);
        prop_assert_eq!(host.read(hx).unwrap(), xs);
    }
}
