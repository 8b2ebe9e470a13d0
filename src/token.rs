//! The parsed-token data model and the process-wide user token-type
//! registry.

use crate::arena::Arena;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Mutex;

/// First id available for user-registered token types. Builtin variants
/// occupy ids below this and are never assignable to a user type.
pub const TT_USER: u32 = 64;

/// A function that renders a user token's payload into the unambiguous
/// text form.
pub type UnambWriter = fn(&[u8], &mut dyn std::fmt::Write) -> std::fmt::Result;

struct TypeEntry {
    name: &'static str,
    unamb_writer: Option<UnambWriter>,
}

struct Registry {
    by_name: HashMap<&'static str, u32>,
    by_id: HashMap<u32, TypeEntry>,
    next_id: u32,
}

impl Registry {
    fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_id: HashMap::new(),
            next_id: TT_USER,
        }
    }
}

static REGISTRY: Lazy<Mutex<Registry>> = Lazy::new(|| Mutex::new(Registry::new()));

/// Register a user token type, returning its id. Idempotent: registering
/// the same name twice returns the id assigned the first time.
pub fn allocate_token_type(name: &'static str) -> u32 {
    let mut reg = REGISTRY.lock().unwrap();
    if let Some(id) = reg.by_name.get(name) {
        return *id;
    }
    let id = reg.next_id;
    reg.next_id += 1;
    reg.by_name.insert(name, id);
    reg.by_id.insert(
        id,
        TypeEntry {
            name,
            unamb_writer: None,
        },
    );
    id
}

/// Register a user token type with formatting hooks, returning its id.
pub fn allocate_token_new(name: &'static str, unamb_writer: UnambWriter) -> u32 {
    let id = allocate_token_type(name);
    let mut reg = REGISTRY.lock().unwrap();
    if let Some(entry) = reg.by_id.get_mut(&id) {
        entry.unamb_writer = Some(unamb_writer);
    }
    id
}

pub fn get_token_type_number(name: &str) -> Option<u32> {
    REGISTRY.lock().unwrap().by_name.get(name).copied()
}

pub fn get_token_type_name(type_id: u32) -> Option<&'static str> {
    REGISTRY.lock().unwrap().by_id.get(&type_id).map(|e| e.name)
}

pub(crate) fn unamb_writer_for(type_id: u32) -> Option<UnambWriter> {
    REGISTRY
        .lock()
        .unwrap()
        .by_id
        .get(&type_id)
        .and_then(|e| e.unamb_writer)
}

/// An arena-resident growable sequence that doubles on overflow.
///
/// Holds only a raw pointer, length, and capacity; it never runs
/// destructors for its elements (the arena it is allocated from never
/// does either), which is sound here because `Token` never owns memory
/// outside the arena that holds it.
#[derive(Clone, Copy)]
pub struct CountedArray<'a, T: Copy> {
    ptr: *mut T,
    len: usize,
    cap: usize,
    arena: &'a Arena,
}

impl<'a, T: Copy> CountedArray<'a, T> {
    pub fn new(arena: &'a Arena) -> Self {
        Self {
            ptr: std::ptr::null_mut(),
            len: 0,
            cap: 0,
            arena,
        }
    }

    pub fn with_capacity(arena: &'a Arena, cap: usize) -> Result<Self, crate::error::ArenaError> {
        if cap == 0 {
            return Ok(Self::new(arena));
        }
        let slice = arena.alloc_bytes_uninit(cap * std::mem::size_of::<T>(), std::mem::align_of::<T>())?;
        Ok(Self {
            ptr: slice.as_mut_ptr() as *mut T,
            len: 0,
            cap,
            arena,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[T] {
        if self.ptr.is_null() {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(self.ptr, self.len) }
        }
    }

    pub fn push(&mut self, value: T) -> Result<(), crate::error::ArenaError> {
        if self.len == self.cap {
            let new_cap = if self.cap == 0 { 4 } else { self.cap * 2 };
            let grown = self
                .arena
                .alloc_bytes_uninit(new_cap * std::mem::size_of::<T>(), std::mem::align_of::<T>())?;
            let new_ptr = grown.as_mut_ptr() as *mut T;
            if !self.ptr.is_null() && self.len > 0 {
                unsafe { std::ptr::copy_nonoverlapping(self.ptr, new_ptr, self.len) };
            }
            self.ptr = new_ptr;
            self.cap = new_cap;
        }
        unsafe { self.ptr.add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    pub fn from_slice(arena: &'a Arena, items: &[T]) -> Result<Self, crate::error::ArenaError> {
        let mut arr = Self::with_capacity(arena, items.len())?;
        for item in items {
            arr.push(*item)?;
        }
        Ok(arr)
    }
}

impl<'a, T: Copy + std::fmt::Debug> std::fmt::Debug for CountedArray<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice().iter()).finish()
    }
}

/// The payload variants a `Token` can carry.
#[derive(Clone, Copy, Debug)]
pub enum TokenKind<'a> {
    None,
    Bytes(&'a [u8]),
    SInt(i64),
    UInt(u64),
    Double(f64),
    Float(f32),
    Sequence(CountedArray<'a, Token<'a>>),
    Err,
    User { type_id: u32, payload: &'a [u8] },
}

/// One node of the parse result tree.
#[derive(Clone, Copy, Debug)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// Byte offset where this token began.
    pub index: usize,
    pub bit_offset: u8,
    /// Number of bits this token's span consumed.
    pub bit_length: i64,
}

impl<'a> Token<'a> {
    pub fn new(kind: TokenKind<'a>, index: usize, bit_offset: u8, bit_length: i64) -> Self {
        Self {
            kind,
            index,
            bit_offset,
            bit_length,
        }
    }

    pub fn none_at(index: usize, bit_offset: u8) -> Self {
        Self::new(TokenKind::None, index, bit_offset, 0)
    }

    pub fn is_none(&self) -> bool {
        matches!(self.kind, TokenKind::None)
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self.kind {
            TokenKind::UInt(v) => Some(v),
            TokenKind::SInt(v) if v >= 0 => Some(v as u64),
            _ => None,
        }
    }

    pub fn as_sint(&self) -> Option<i64> {
        match self.kind {
            TokenKind::SInt(v) => Some(v),
            TokenKind::UInt(v) => Some(v as i64),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_array_grows_past_initial_capacity() {
        let arena = Arena::new();
        let mut arr: CountedArray<u32> = CountedArray::new(&arena);
        for i in 0..100u32 {
            arr.push(i).unwrap();
        }
        assert_eq!(arr.len(), 100);
        assert_eq!(arr.as_slice()[99], 99);
        assert_eq!(arr.as_slice()[0], 0);
    }

    #[test]
    fn token_type_registration_is_idempotent() {
        let a = allocate_token_type("spec_full_example_type_a");
        let b = allocate_token_type("spec_full_example_type_a");
        assert_eq!(a, b);
        assert!(a >= TT_USER);
    }

    #[test]
    fn token_type_ids_are_never_reused_across_names() {
        let a = allocate_token_type("spec_full_example_type_b1");
        let b = allocate_token_type("spec_full_example_type_b2");
        assert_ne!(a, b);
    }
}
