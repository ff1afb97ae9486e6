use crate::value::Value;

/// A heap-allocated string: djb2 hash cached alongside the bytes so the
/// interner (`crate::interner::StringInterner`) never rehashes on
/// lookup (spec.md §4.7; `original_source/lib/obj.h`'s `String`).
#[derive(Debug, Clone, PartialEq)]
pub struct RtString {
    pub hash: u32,
    pub bytes: String,
}

/// (`original_source/lib/obj.h`'s `Array`.) Nothing in the mandatory
/// primitive set allocates one yet; the variant exists so the heap
/// object model matches spec.md §3's data model in full.
#[derive(Debug, Clone, Default)]
pub struct RtArray {
    pub items: Vec<Value>,
}

/// (`original_source/lib/obj.h`'s `UObject`.) Unreachable from the
/// current grammar, which has no type-declaration production; kept for
/// the same reason as `RtArray`.
#[derive(Debug, Clone, Default)]
pub struct RtUserObject {
    pub fields: Vec<Value>,
}

/// The one heap-object identity spec.md §9 asks for ("model this as a
/// sum of fixed-layout structs behind a single heap-object identity").
/// `fgc::GcRef<HeapObject>` is the stable handle into wherever the
/// collector keeps these; there is no separate `GC_HEADER` struct
/// because `fgc::BumpCollector` never marks or moves objects.
#[derive(Debug, Clone)]
pub enum HeapObject {
    String(RtString),
    Array(RtArray),
    UserObject(RtUserObject),
}
