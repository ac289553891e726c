//! An arena of reusable limb buffers, classified by size.
//!
//! The wide-integer and polynomial layers perform dozens of transient
//! allocations per multiply. Rather than going back to the global allocator
//! for each one, components borrow a [`MemoryPool`] and return buffers to it
//! on drop via [`PooledBuffer`].

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A shared arena of `Vec<u64>` limb buffers, bucketed by capacity.
///
/// Cloning a `MemoryPool` is cheap: it shares the same underlying free
/// lists. Callers that want independent pools (e.g. one per worker thread,
/// to avoid lock contention) should construct a fresh pool with [`MemoryPool::new`]
/// rather than clone an existing one.
#[derive(Clone, Debug)]
pub struct MemoryPool {
	free_lists: Arc<RwLock<HashMap<usize, Vec<Vec<u64>>>>>,
}

impl MemoryPool {
	/// Creates a new, empty pool.
	pub fn new() -> Self {
		Self {
			free_lists: Arc::new(RwLock::new(HashMap::new())),
		}
	}

	/// Returns the process-wide default pool. Every call returns a handle
	/// sharing the same free lists; construct a dedicated pool instead if
	/// contention between unrelated callers is a concern.
	pub fn global() -> Self {
		GLOBAL_POOL.with(|p| p.clone())
	}

	/// Borrows (or allocates) a zeroed buffer of exactly `len` limbs.
	pub fn get(&self, len: usize) -> PooledBuffer {
		let mut buf = {
			let mut lists = self.free_lists.write().expect("memory pool lock poisoned");
			lists.get_mut(&len).and_then(|v| v.pop())
		}
		.unwrap_or_else(|| vec![0u64; len]);

		buf.iter_mut().for_each(|limb| *limb = 0);

		PooledBuffer {
			data: Some(buf),
			pool: self.clone(),
		}
	}

	fn release(&self, buf: Vec<u64>) {
		let len = buf.len();
		let mut lists = self.free_lists.write().expect("memory pool lock poisoned");
		lists.entry(len).or_default().push(buf);
	}
}

impl Default for MemoryPool {
	fn default() -> Self {
		Self::new()
	}
}

thread_local! {
	static GLOBAL_POOL: MemoryPool = MemoryPool::new();
}

/// A limb buffer on loan from a [`MemoryPool`]. Returns its storage to the
/// pool's free list automatically on drop.
#[derive(Debug)]
pub struct PooledBuffer {
	data: Option<Vec<u64>>,
	pool: MemoryPool,
}

impl std::ops::Deref for PooledBuffer {
	type Target = [u64];

	fn deref(&self) -> &[u64] {
		self.data.as_deref().expect("buffer taken")
	}
}

impl std::ops::DerefMut for PooledBuffer {
	fn deref_mut(&mut self) -> &mut [u64] {
		self.data.as_deref_mut().expect("buffer taken")
	}
}

impl Drop for PooledBuffer {
	fn drop(&mut self) {
		if let Some(buf) = self.data.take() {
			self.pool.release(buf);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reuses_released_buffers() {
		let pool = MemoryPool::new();
		{
			let mut buf = pool.get(8);
			buf[0] = 42;
		}
		let buf = pool.get(8);
		assert_eq!(buf.len(), 8);
		assert_eq!(buf[0], 0, "buffers are zeroed on checkout");
	}

	#[test]
	fn independent_pools_do_not_share_lists() {
		let a = MemoryPool::new();
		let b = MemoryPool::new();
		let _held = a.get(4);
		assert!(b.get(4).iter().all(|&x| x == 0));
	}
}
