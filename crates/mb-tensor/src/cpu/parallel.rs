use log::debug;
use rayon::prelude::*;

use crate::backend::MatmulBackend;
use crate::error::{MatrixError, Result};
use crate::kernel;

/// Default number of worker threads.
pub const DEFAULT_THREADS: usize = 16;

/// Row-partitioned CPU backend running on a dedicated rayon thread pool.
///
/// The output rows are split into `threads` contiguous blocks. Each worker
/// owns one block of C and only reads A and B, so no synchronisation is
/// needed until the pool joins.
#[derive(Debug)]
pub struct ThreadPoolBackend {
    pool: rayon::ThreadPool,
    threads: usize,
}

impl ThreadPoolBackend {
    /// Build a backend with its own pool of `threads` workers.
    ///
    /// # Errors
    /// `InvalidThreadCount` if `threads == 0`, `ThreadPool` if the pool
    /// cannot be spawned.
    pub fn new(threads: usize) -> Result<Self> {
        if threads == 0 {
            return Err(MatrixError::InvalidThreadCount);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("mb-matmul-{}", i))
            .build()
            .map_err(|e| MatrixError::ThreadPool(e.to_string()))?;
        Ok(ThreadPoolBackend { pool, threads })
    }

    /// Number of output rows each worker owns for an `m`-row result.
    pub fn rows_per_block(&self, m: usize) -> usize {
        m.div_ceil(self.threads).max(1)
    }
}

impl MatmulBackend for ThreadPoolBackend {
    fn name(&self) -> &str {
        "threads"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        kernel::check_operands(a, b, m, k, n)?;

        let mut c = vec![0.0f64; m * n];
        if c.is_empty() {
            return Ok(c);
        }

        let rows_per_block = self.rows_per_block(m);
        debug!(
            "threads: {} workers, {} rows per block for [{}x{}]",
            self.threads, rows_per_block, m, n
        );

        self.pool.install(|| {
            c.par_chunks_mut(rows_per_block * n)
                .enumerate()
                .for_each(|(block, rows)| {
                    let first_row = block * rows_per_block;
                    for (offset, row) in rows.chunks_mut(n).enumerate() {
                        kernel::fill_row(a, b, first_row + offset, k, n, row);
                    }
                });
        });
        Ok(c)
    }
}
