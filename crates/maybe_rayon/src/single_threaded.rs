use std::slice::{ChunksMut, Iter};

pub trait MaybeParallelRefExt<T> {
    fn maybe_par_iter(&self) -> Iter<'_, T>;
}

pub trait MaybeParallelSliceMut<T> {
    fn maybe_par_chunks_mut(&mut self, chunk_size: usize) -> ChunksMut<'_, T>;
}

impl<T: Sync> MaybeParallelRefExt<T> for [T] {
    fn maybe_par_iter(&self) -> Iter<'_, T> {
        self.iter()
    }
}

impl<T: Send> MaybeParallelSliceMut<T> for [T] {
    fn maybe_par_chunks_mut(&mut self, chunk_size: usize) -> ChunksMut<'_, T> {
        self.chunks_mut(chunk_size)
    }
}
