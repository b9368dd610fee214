use std::sync::{Arc, Mutex, MutexGuard, Weak};

use log::trace;

use super::signal::{Callback, Inner, Source};
use super::Signal;

/// Builds a derived signal recomputed from `sources`.
///
/// The output holds its inputs strongly and their subscriber lists hold the
/// output weakly, so a derived signal lives as long as someone holds it and
/// unregisters from its inputs when the last handle is dropped.
///
/// `compute` runs without any lock held. Its result is committed only if the
/// inputs still have the versions it was computed from; otherwise it is
/// discarded and recomputed, so concurrent updates on different threads can
/// never leave a stale value behind.
fn derive<R, F>(sources: Vec<Arc<dyn Source>>, compute: F) -> Signal<R>
where
    R: Send + Sync + 'static,
    F: Fn() -> Option<R> + Send + Sync + 'static,
{
    let output = Signal::<R>::empty();
    let target = Arc::downgrade(&output.inner);
    let watched: Vec<Weak<dyn Source>> = sources.iter().map(Arc::downgrade).collect();
    let committed: Mutex<Option<Vec<u64>>> = Mutex::new(None);

    let recompute: Callback = Arc::new(move || {
        loop {
            let Some(target) = target.upgrade() else { return };
            let Some(versions) = versions_of(&watched) else { return };

            // Combine-latest: wait until every input has produced a value.
            if versions.contains(&0) {
                return;
            }
            if lock(&committed).as_ref() == Some(&versions) {
                trace!("Inputs unchanged at {:?}; skipping recompute", versions);
                return;
            }

            let Some(value) = compute() else { return };

            {
                let mut committed = lock(&committed);
                if versions_of(&watched).as_ref() != Some(&versions) {
                    trace!("Inputs moved past {:?} during recompute; retrying", versions);
                    continue;
                }
                *committed = Some(versions);
                Signal { inner: Arc::clone(&target) }.store(Arc::new(value));
            }
            Signal { inner: target }.notify();
            return;
        }
    });

    for source in sources {
        let id = source.add_subscriber(Arc::clone(&recompute));
        output.inner.attach(source, id);
    }
    recompute();

    output
}

fn versions_of(sources: &[Weak<dyn Source>]) -> Option<Vec<u64>> {
    sources
        .iter()
        .map(|source| source.upgrade().map(|source| source.version()))
        .collect()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn source_of<T: Send + Sync + 'static>(signal: &Signal<T>) -> Arc<dyn Source> {
    let source: Arc<Inner<T>> = Arc::clone(&signal.inner);
    source
}

fn value_of<T>(weak: &Weak<Inner<T>>) -> Option<Arc<T>> {
    weak.upgrade()?.snapshot().0
}

impl<T: Send + Sync + 'static> Signal<T> {
    /// Derives a signal by applying `f` to every value of this one.
    pub fn map<R, F>(&self, f: F) -> Signal<R>
    where
        R: Send + Sync + 'static,
        F: Fn(&T) -> R + Send + Sync + 'static,
    {
        let a = Arc::downgrade(&self.inner);
        derive(vec![source_of(self)], move || {
            let a = value_of(&a)?;
            Some(f(&*a))
        })
    }
}

/// Derives a signal from the latest values of two signals.
///
/// # Example
///
/// ```
/// use cheatsheet_lib::reactive::{combine2, Signal};
///
/// let rows = Signal::<Vec<u32>>::empty();
/// let limit = Signal::new(2usize);
/// let shown = combine2(&rows, &limit, |rows, limit| {
///     rows.iter().take(*limit).copied().collect::<Vec<_>>()
/// });
///
/// // Nothing is derived until every input has a value.
/// assert!(shown.get().is_none());
///
/// rows.set(vec![4, 5, 6]);
/// assert_eq!(*shown.get().unwrap(), vec![4, 5]);
/// ```
pub fn combine2<A, B, R, F>(a: &Signal<A>, b: &Signal<B>, f: F) -> Signal<R>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(&A, &B) -> R + Send + Sync + 'static,
{
    let (wa, wb) = (Arc::downgrade(&a.inner), Arc::downgrade(&b.inner));
    derive(vec![source_of(a), source_of(b)], move || {
        let a = value_of(&wa)?;
        let b = value_of(&wb)?;
        Some(f(&*a, &*b))
    })
}

/// Derives a signal from the latest values of three signals.
pub fn combine3<A, B, C, R, F>(a: &Signal<A>, b: &Signal<B>, c: &Signal<C>, f: F) -> Signal<R>
where
    A: Send + Sync + 'static,
    B: Send + Sync + 'static,
    C: Send + Sync + 'static,
    R: Send + Sync + 'static,
    F: Fn(&A, &B, &C) -> R + Send + Sync + 'static,
{
    let (wa, wb, wc) = (
        Arc::downgrade(&a.inner),
        Arc::downgrade(&b.inner),
        Arc::downgrade(&c.inner),
    );
    derive(vec![source_of(a), source_of(b), source_of(c)], move || {
        let a = value_of(&wa)?;
        let b = value_of(&wb)?;
        let c = value_of(&wc)?;
        Some(f(&*a, &*b, &*c))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_map_follows_source() {
        let source = Signal::new(2);
        let doubled = source.map(|v| v * 2);
        assert_eq!(*doubled.get().unwrap(), 4);

        source.set(5);
        assert_eq!(*doubled.get().unwrap(), 10);
    }

    #[test]
    fn test_combine_waits_for_all_inputs() {
        let a = Signal::<i32>::empty();
        let b = Signal::new(1);
        let c = Signal::<i32>::empty();
        let sum = combine3(&a, &b, &c, |a, b, c| a + b + c);

        a.set(10);
        assert!(!sum.has_value());

        c.set(100);
        assert_eq!(*sum.get().unwrap(), 111);
    }

    #[test]
    fn test_combine_emits_on_every_input_update() {
        let a = Signal::new(1);
        let b = Signal::new(1);
        let product = combine2(&a, &b, |a, b| a * b);

        a.set(3);
        assert_eq!(*product.get().unwrap(), 3);
        b.set(4);
        assert_eq!(*product.get().unwrap(), 12);
        assert_eq!(product.version(), 3);
    }

    #[test]
    fn test_recompute_skipped_when_versions_unchanged() {
        let runs = Arc::new(AtomicUsize::new(0));
        let a = Signal::new(1);

        // Both inputs are the same signal, so every update notifies twice.
        let counter = Arc::clone(&runs);
        let sum = combine2(&a, &a, move |x, y| {
            counter.fetch_add(1, Ordering::SeqCst);
            x + y
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        a.set(5);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(*sum.get().unwrap(), 10);
    }

    #[test]
    fn test_chained_derivations() {
        let rows = Signal::<Vec<i32>>::empty();
        let sorted = rows.map(|rows| {
            let mut rows = rows.clone();
            rows.sort();
            rows
        });
        let first = sorted.map(|rows| rows.first().copied());

        assert!(!first.has_value());
        rows.set(vec![3, 1, 2]);
        assert_eq!(*first.get().unwrap(), Some(1));
    }

    #[test]
    fn test_intermediate_kept_alive_by_output() {
        let source = Signal::new(1);
        let head = source.map(|v| v + 1).map(|v| v * 10);

        source.set(2);
        assert_eq!(*head.get().unwrap(), 30);
    }

    #[test]
    fn test_dropping_derived_unsubscribes_from_inputs() {
        let a = Signal::new(1);
        let b = Signal::new(2);
        let sum = combine2(&a, &b, |a, b| a + b);
        let label = sum.map(|sum| format!("{sum}"));
        assert_eq!(a.subscriber_count(), 1);
        assert_eq!(b.subscriber_count(), 1);
        assert_eq!(sum.subscriber_count(), 1);

        drop(sum);
        a.set(5);
        assert_eq!(label.get().unwrap().as_str(), "7");

        drop(label);
        assert_eq!(a.subscriber_count(), 0);
        assert_eq!(b.subscriber_count(), 0);
    }

    #[test]
    fn test_repeated_derivations_do_not_accumulate_subscribers() {
        let source = Signal::new(1);
        for _ in 0..100 {
            let doubled = source.map(|v| v * 2);
            assert_eq!(*doubled.get().unwrap(), 2);
        }
        assert_eq!(source.subscriber_count(), 0);
    }

    #[test]
    fn test_slow_recompute_does_not_overwrite_newer_value() {
        let a = Signal::new(0);
        let b = Signal::new(0);
        let stalled = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&stalled);
        let sum = combine2(&a, &b, move |a, b| {
            // Hold up the computation that still sees the old `b`.
            if *a == 1 && *b == 0 {
                flag.store(true, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(100));
            }
            a + b
        });

        let writer = {
            let a = a.clone();
            thread::spawn(move || a.set(1))
        };
        while !stalled.load(Ordering::SeqCst) {
            thread::yield_now();
        }
        b.set(10);
        writer.join().unwrap();

        assert_eq!(*sum.get().unwrap(), 11);
    }
}
