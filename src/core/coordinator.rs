//! Process-wide playback coordination.
//!
//! Only one audio-producing surface (inline waveform scrubber vs. the
//! fullscreen player) may play at a time. Each surface registers a stop
//! callback under its own key; starting playback anywhere calls
//! [`stop_all_except`] first.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

type StopCallback = Box<dyn Fn() + Send + Sync>;

/// Owner-keyed stop callbacks.
#[derive(Default)]
struct Registry {
    callbacks: Mutex<HashMap<String, StopCallback>>,
}

impl Registry {
    fn register<F>(&self, owner: String, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        if let Ok(mut map) = self.callbacks.lock() {
            map.insert(owner, Box::new(callback));
        }
    }

    fn unregister(&self, owner: &str) {
        if let Ok(mut map) = self.callbacks.lock() {
            map.remove(owner);
        }
    }

    fn stop_all_except(&self, owner: &str) {
        if let Ok(map) = self.callbacks.lock() {
            for (key, callback) in map.iter() {
                if key != owner {
                    callback();
                }
            }
        }
    }
}

fn global() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::default)
}

/// Register (or replace) the stop callback for an owner key.
pub fn register_stop_callback<F>(owner: impl Into<String>, callback: F)
where
    F: Fn() + Send + Sync + 'static,
{
    global().register(owner.into(), callback);
}

/// Remove an owner's callback, e.g. when its surface unmounts.
pub fn unregister(owner: &str) {
    global().unregister(owner);
}

/// Stop every registered surface except `owner`.
pub fn stop_all_except(owner: &str) {
    global().stop_all_except(owner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_stop_all_except_skips_owner() {
        let registry = Registry::default();
        let stopped = Arc::new(AtomicUsize::new(0));
        let a = stopped.clone();
        let b = stopped.clone();
        registry.register("scrubber".to_string(), move || {
            a.fetch_add(1, Ordering::SeqCst);
        });
        registry.register("player".to_string(), move || {
            b.fetch_add(100, Ordering::SeqCst);
        });

        registry.stop_all_except("player");
        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_replacing_a_callback_drops_the_old_one() {
        let registry = Registry::default();
        let stopped = Arc::new(AtomicUsize::new(0));
        let old = stopped.clone();
        let new = stopped.clone();
        registry.register("scrubber".to_string(), move || {
            old.fetch_add(1, Ordering::SeqCst);
        });
        registry.register("scrubber".to_string(), move || {
            new.fetch_add(10, Ordering::SeqCst);
        });

        registry.stop_all_except("nobody");
        assert_eq!(stopped.load(Ordering::SeqCst), 10);

        registry.unregister("scrubber");
        registry.stop_all_except("nobody");
        assert_eq!(stopped.load(Ordering::SeqCst), 10);
    }
}
