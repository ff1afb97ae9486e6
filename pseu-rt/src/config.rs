/// Host-embedding configuration (spec.md §6 `vm_new(config)`). The
/// allocator hooks (`alloc`/`realloc`/`free`) are out of scope here —
/// `fgc::BumpCollector` owns heap memory internally — so this carries
/// only the one host callback the interpreter itself calls mid-run:
/// `print`, used by `@output`. `on_error`/`on_warn` are the
/// `pseu_util::Handler` diagnostics drained by the driver at compile
/// time, not part of the running VM.
pub struct VmConfig {
    pub print: Box<dyn FnMut(&str)>,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self { print: Box::new(|text| print!("{text}")) }
    }
}
