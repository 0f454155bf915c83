/// A macro to simplify read-through caching.
///
/// Checks the cache for a fresh value under the key. If found, returns
/// the cached value. If not, executes the provided block to compute the
/// value, stores it under the key with the given TTL, and returns it.
///
/// # Arguments
/// * `$cache`: the [`Cache`](crate::cache::Cache) instance.
/// * `$key`: the [`CacheKey`](crate::cache::CacheKey) to cache under.
/// * `$ttl`: how long the computed value stays fresh.
/// * `$block`: the async block computing the value on a miss.
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get(&$key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set(&$key, &value, $ttl).await;
            Ok(value)
        }
    }};
}
