use std::fmt::Debug;

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A reactive value that can be watched for changes.
///
/// Views publish their `PlayerState` through one of these so rendering code
/// can react without reaching into the view task, and the window broker
/// publishes the miniplayer existence flag the same way so it can be read
/// without a round trip.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Set a new value and notify all watchers.
    ///
    /// Only notifies if the value is different. Only accessible within the
    /// crate so that state has a single owner.
    pub(crate) fn set(&self, new_value: T)
    where
        T: PartialEq,
    {
        self.tx.send_if_modified(|current| {
            if *current != new_value {
                *current = new_value;
                true
            } else {
                false
            }
        });
    }

    /// Get the current value.
    ///
    /// Never blocks; clones the last published value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Watch for changes to this property.
    ///
    /// The stream immediately yields the current value, then yields
    /// whenever the value changes.
    pub fn watch(&self) -> impl Stream<Item = T> + Send {
        WatchStream::new(self.rx.clone())
    }

    /// Wait until the value satisfies `predicate` and return it.
    ///
    /// Resolves immediately if the current value already matches. Returns
    /// `None` if every sender has been dropped first.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<T> {
        let mut rx = self.rx.clone();
        let matched = rx
            .wait_for(|value| predicate(value))
            .await
            .ok()
            .map(|value| value.clone());
        matched
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn set_notifies_only_on_change() {
        let property = Property::new(1);
        let mut stream = Box::pin(property.watch());

        assert_eq!(stream.next().await, Some(1));

        property.set(1);
        property.set(2);
        assert_eq!(stream.next().await, Some(2));
        assert_eq!(property.get(), 2);
    }

    #[tokio::test]
    async fn wait_for_resolves_on_matching_value() {
        let property = Property::new(false);
        let setter = property.clone();

        tokio::spawn(async move { setter.set(true) });

        assert_eq!(property.wait_for(|value| *value).await, Some(true));
    }
}
