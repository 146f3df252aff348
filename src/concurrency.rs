/// Bounded worker-pool size: never more workers than tasks, and never more
/// than `2 * NumCPU + 1` regardless of batch size.
pub fn worker_pool_size(batch_len: usize) -> usize {
    batch_len.min(2 * num_cpus::get() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_size_is_bounded_by_batch_len() {
        assert_eq!(worker_pool_size(0), 0);
        assert!(worker_pool_size(1) <= 1);
    }

    #[test]
    fn pool_size_is_bounded_by_cpu_formula() {
        let cap = 2 * num_cpus::get() + 1;
        assert!(worker_pool_size(10_000) <= cap);
    }
}
