//! An ordered map and set based on an AVL tree whose entries are also threaded, in key order, on
//! a doubly linked list.
//!
//! The tree gives logarithmic lookup, insertion and removal. The list gives constant-time access
//! to the first and last entries and constant-time stepping between neighbours, which [`Cursor`]s
//! and the iterators use instead of walking the tree.
//!
//! ```
//! use threaded_avl::{Error, Map};
//!
//! let mut map = Map::new();
//! map.insert(3, "c");
//! map.insert(1, "a");
//! map.insert(2, "b");
//!
//! assert_eq!(map.begin().get(&map), Ok((&1, &"a")));
//! assert_eq!(map.at(&4), Err(Error::KeyNotFound));
//!
//! let erased = map.find(&2);
//! assert_eq!(map.erase(erased), Ok((2, "b")));
//! assert_eq!(map.iter().map(|e| *e.0).collect::<Vec<_>>(), [1, 3]);
//! ```

mod balance;
pub mod cursor;
mod error;
pub mod map;
mod node;
pub mod set;

#[cfg(feature = "ordered_iter")]
mod ordered_iter;

#[cfg(feature = "quickcheck")]
mod quickcheck;

pub use cursor::Cursor;
pub use error::{Error, Result};
pub use map::Map;
pub use set::Set;
