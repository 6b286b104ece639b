use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Stable identifier naming a native instance for the lifetime of a bridge
/// session. Identifiers are allocated monotonically starting at 1 and are
/// never reassigned to a different live instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub u64);

/// How the registry holds on to a registered instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// The registry keeps the instance alive.
    Strong,
    /// The registry observes the instance without extending its lifetime.
    Weak,
}

type ErasedInstance = Arc<dyn Any + Send + Sync>;

enum Holder {
    Strong(ErasedInstance),
    Weak(Weak<dyn Any + Send + Sync>),
}

impl Holder {
    fn is_live(&self) -> bool {
        match self {
            Holder::Strong(_) => true,
            Holder::Weak(weak) => weak.strong_count() > 0,
        }
    }

    fn upgrade(&self) -> Option<ErasedInstance> {
        match self {
            Holder::Strong(instance) => Some(Arc::clone(instance)),
            Holder::Weak(weak) => weak.upgrade(),
        }
    }
}

struct Entry {
    address: usize,
    holder: Holder,
}

struct Table {
    by_address: HashMap<usize, InstanceId>,
    by_id: HashMap<InstanceId, Entry>,
    next_id: u64,
}

/// Bidirectional table mapping live native instances to [`InstanceId`]s.
///
/// Identity is by `Arc` allocation address, not value equality. The table is
/// guarded by a single lock; the lock is never held across caller code, so
/// reentrant registration from nested event forwarding cannot deadlock.
///
/// The registry is plain shared infrastructure: construct one, wrap it in an
/// `Arc`, and hand it to every component that needs it.
pub struct InstanceRegistry {
    table: Mutex<Table>,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InstanceRegistry {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                by_address: HashMap::new(),
                by_id: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `instance` if it is not already present and return its
    /// identifier. Idempotent: a live registered instance keeps its existing
    /// identifier no matter how often this is called.
    ///
    /// Re-registering a weakly-held instance with [`ReferenceKind::Strong`]
    /// upgrades the holder in place without changing the identifier. The
    /// reverse transition only happens through [`downgrade`](Self::downgrade),
    /// so a caller cannot shorten a lifetime by accident.
    pub fn register_if_absent<T>(&self, instance: &Arc<T>, kind: ReferenceKind) -> InstanceId
    where
        T: Any + Send + Sync,
    {
        let address = address_of(instance);
        let mut table = self.lock();

        if let Some(&id) = table.by_address.get(&address) {
            let live = table
                .by_id
                .get(&id)
                .map(|entry| entry.holder.is_live())
                .unwrap_or(false);
            if live {
                if kind == ReferenceKind::Strong {
                    if let Some(entry) = table.by_id.get_mut(&id) {
                        if let Holder::Weak(_) = entry.holder {
                            let cloned = Arc::clone(instance);
                            let erased: ErasedInstance = cloned;
                            entry.holder = Holder::Strong(erased);
                        }
                    }
                }
                return id;
            }
            // The previous occupant of this address died while weakly held
            // and the allocator reused the address for `instance`. Its
            // identifier is retired, never transferred.
            table.by_address.remove(&address);
            table.by_id.remove(&id);
        }

        let id = InstanceId(table.next_id);
        table.next_id += 1;
        let cloned = Arc::clone(instance);
        let erased: ErasedInstance = cloned;
        let holder = match kind {
            ReferenceKind::Strong => Holder::Strong(erased),
            ReferenceKind::Weak => Holder::Weak(Arc::downgrade(&erased)),
        };
        table.by_address.insert(address, id);
        table.by_id.insert(id, Entry { address, holder });
        id
    }

    /// Look up the identifier for `instance`, never allocating one.
    ///
    /// `None` means the instance was never registered or has been released;
    /// callers treat this as an expected, recoverable condition. A weakly
    /// held entry whose instance has been dropped is removed on discovery
    /// and reported absent.
    pub fn lookup<T>(&self, instance: &Arc<T>) -> Option<InstanceId>
    where
        T: Any + Send + Sync,
    {
        let address = address_of(instance);
        let mut table = self.lock();
        let id = *table.by_address.get(&address)?;
        let live = table
            .by_id
            .get(&id)
            .map(|entry| entry.holder.is_live())
            .unwrap_or(false);
        if live {
            Some(id)
        } else {
            table.by_address.remove(&address);
            table.by_id.remove(&id);
            None
        }
    }

    /// Whether `instance` is currently registered.
    pub fn contains<T>(&self, instance: &Arc<T>) -> bool
    where
        T: Any + Send + Sync,
    {
        self.lookup(instance).is_some()
    }

    /// Fetch the instance registered under `id`, upgrading a weak holder.
    /// Returns `None` for unknown identifiers and for weakly-held instances
    /// that have already been dropped.
    pub fn instance(&self, id: InstanceId) -> Option<ErasedInstance> {
        let mut table = self.lock();
        let (address, upgraded) = {
            let entry = table.by_id.get(&id)?;
            (entry.address, entry.holder.upgrade())
        };
        match upgraded {
            Some(instance) => Some(instance),
            None => {
                table.by_address.remove(&address);
                table.by_id.remove(&id);
                None
            }
        }
    }

    /// Remove the mapping for `id`. No-op on unknown identifiers.
    pub fn release(&self, id: InstanceId) {
        let mut table = self.lock();
        if let Some(entry) = table.by_id.remove(&id) {
            table.by_address.remove(&entry.address);
        }
    }

    /// Convert a strong holder into a weak one, letting the instance die
    /// once no other owner remains. Returns `true` when a strong holder was
    /// converted; `false` for unknown identifiers and already-weak entries.
    pub fn downgrade(&self, id: InstanceId) -> bool {
        let mut table = self.lock();
        let Some(entry) = table.by_id.get_mut(&id) else {
            return false;
        };
        match &entry.holder {
            Holder::Strong(instance) => {
                entry.holder = Holder::Weak(Arc::downgrade(instance));
                true
            }
            Holder::Weak(_) => false,
        }
    }

    /// Drop entries whose weakly-held instance has died, returning the
    /// identifiers freed so the embedder can signal disposal to the remote
    /// side.
    pub fn prune(&self) -> Vec<InstanceId> {
        let mut table = self.lock();
        let dead: Vec<(InstanceId, usize)> = table
            .by_id
            .iter()
            .filter(|(_, entry)| !entry.holder.is_live())
            .map(|(&id, entry)| (id, entry.address))
            .collect();
        for (id, address) in &dead {
            table.by_id.remove(id);
            table.by_address.remove(address);
        }
        dead.into_iter().map(|(id, _)| id).collect()
    }

    /// Number of live registered instances.
    pub fn len(&self) -> usize {
        self.lock()
            .by_id
            .values()
            .filter(|entry| entry.holder.is_live())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn address_of<T>(instance: &Arc<T>) -> usize {
    Arc::as_ptr(instance) as *const () as usize
}
