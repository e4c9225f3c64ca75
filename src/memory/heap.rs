//! Heap implementation for the interpreter
//!
//! This module provides storage for runtime objects that are shared or
//! mutable:
//! - Mutable cells (`cell`, `get`, `put`)
//! - Lambdas created by `fn` and `defn`
//! - Explicit deallocation (`free`) with tombstone tracking
//! - Use-after-free and double-free detection
//!
//! Addresses are handed out by a bump pointer and never reused, so a
//! tombstone stays visible in the history for as long as the run lasts.
//! There is no automatic reclamation.

use super::value::{Address, Value};
use crate::interpreter::constants::HEAP_ADDRESS_START;
use crate::interpreter::errors::HeapError;
use crate::parser::ast::Node;
use std::collections::BTreeMap;
use std::rc::Rc;

/// A user-defined function
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<[Node]>,
}

impl Lambda {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<lambda>")
    }
}

/// Object stored in a heap block
#[derive(Debug, Clone, PartialEq)]
pub enum HeapObject {
    Cell(Value),
    Lambda(Rc<Lambda>),
}

impl HeapObject {
    pub fn kind(&self) -> &'static str {
        match self {
            HeapObject::Cell(_) => "cell",
            HeapObject::Lambda(_) => "lambda",
        }
    }
}

/// State of a heap block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockState {
    Allocated,
    Tombstone, // Freed but kept for history display
}

/// A block of heap memory
#[derive(Debug, Clone)]
pub struct HeapBlock {
    pub object: HeapObject,
    pub state: BlockState,
}

/// The heap
#[derive(Debug, Clone)]
pub struct Heap {
    allocations: BTreeMap<Address, HeapBlock>,
    next_address: Address,
    live_objects: usize,
    max_objects: usize,
}

impl Heap {
    /// Create a new heap holding at most `max_objects` live objects
    pub fn new(max_objects: usize) -> Self {
        Heap {
            allocations: BTreeMap::new(),
            next_address: HEAP_ADDRESS_START,
            live_objects: 0,
            max_objects,
        }
    }

    /// Allocate a new object
    pub fn allocate(&mut self, object: HeapObject) -> Result<Address, HeapError> {
        if self.live_objects >= self.max_objects {
            return Err(HeapError::OutOfMemory {
                limit: self.max_objects,
            });
        }

        let addr = self.next_address;
        self.next_address += 1;
        self.allocations.insert(
            addr,
            HeapBlock {
                object,
                state: BlockState::Allocated,
            },
        );
        self.live_objects += 1;

        Ok(addr)
    }

    /// Free an object (mark as tombstone)
    pub fn free(&mut self, addr: Address) -> Result<(), HeapError> {
        match self.allocations.get_mut(&addr) {
            Some(block) if block.state == BlockState::Allocated => {
                block.state = BlockState::Tombstone;
                self.live_objects -= 1;
                Ok(())
            }
            Some(_) => Err(HeapError::DoubleFree { address: addr }),
            None => Err(HeapError::InvalidAddress { address: addr }),
        }
    }

    /// Get a live object
    pub fn get(&self, addr: Address) -> Result<&HeapObject, HeapError> {
        match self.allocations.get(&addr) {
            Some(block) if block.state == BlockState::Allocated => Ok(&block.object),
            Some(_) => Err(HeapError::UseAfterFree { address: addr }),
            None => Err(HeapError::InvalidAddress { address: addr }),
        }
    }

    fn get_mut(&mut self, addr: Address) -> Result<&mut HeapObject, HeapError> {
        match self.allocations.get_mut(&addr) {
            Some(block) if block.state == BlockState::Allocated => Ok(&mut block.object),
            Some(_) => Err(HeapError::UseAfterFree { address: addr }),
            None => Err(HeapError::InvalidAddress { address: addr }),
        }
    }

    /// Read the value held by a cell
    pub fn read(&self, addr: Address) -> Result<&Value, HeapError> {
        match self.get(addr)? {
            HeapObject::Cell(value) => Ok(value),
            other => Err(HeapError::NotACell {
                address: addr,
                kind: other.kind(),
            }),
        }
    }

    /// Overwrite the value held by a cell
    pub fn write(&mut self, addr: Address, value: Value) -> Result<(), HeapError> {
        match self.get_mut(addr)? {
            HeapObject::Cell(slot) => {
                *slot = value;
                Ok(())
            }
            other => Err(HeapError::NotACell {
                address: addr,
                kind: other.kind(),
            }),
        }
    }

    /// All blocks in address order (includes tombstones)
    pub fn allocations(&self) -> &BTreeMap<Address, HeapBlock> {
        &self.allocations
    }

    /// Number of live objects
    pub fn live_objects(&self) -> usize {
        self.live_objects
    }

    pub fn max_objects(&self) -> usize {
        self.max_objects
    }
}

impl Default for Heap {
    fn default() -> Self {
        Self::new(crate::interpreter::constants::DEFAULT_HEAP_LIMIT)
    }
}
