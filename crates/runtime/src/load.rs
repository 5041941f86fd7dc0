/// Lifecycle of a late-bound resource such as a third-party script or the map
/// instance built from it.
///
/// Loading → Ready(handle)
/// Loading → Unavailable(reason)
///
/// There is no transition out of `Unavailable`; a page that could not load its
/// map keeps the placeholder for the rest of its life.
#[derive(Debug)]
pub enum LoadState<H> {
    Loading,
    Ready(H),
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// Required configuration (for example an access token) is absent or malformed.
    Unconfigured(String),
    /// The resource failed to load or initialize.
    Failed(String),
    /// The owner went away before loading finished.
    Cancelled,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::Unconfigured(msg) => write!(f, "not configured: {msg}"),
            UnavailableReason::Failed(msg) => write!(f, "failed to load: {msg}"),
            UnavailableReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl<H> Default for LoadState<H> {
    fn default() -> Self {
        LoadState::Loading
    }
}

impl<H> LoadState<H> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }

    pub fn ready(&self) -> Option<&H> {
        match self {
            LoadState::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut H> {
        match self {
            LoadState::Ready(h) => Some(h),
            _ => None,
        }
    }

    pub fn unavailable(&self) -> Option<&UnavailableReason> {
        match self {
            LoadState::Unavailable(reason) => Some(reason),
            _ => None,
        }
    }

    /// Moves to `Unavailable(reason)` and hands back the ready handle, if any,
    /// so the caller can release it.
    pub fn fail(&mut self, reason: UnavailableReason) -> Option<H> {
        match std::mem::replace(self, LoadState::Unavailable(reason)) {
            LoadState::Ready(h) => Some(h),
            _ => None,
        }
    }
}

/// Identifies one mount of a component. Completions carrying an older
/// generation belong to a previous mount and must be ignored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

/// Tracks whether the owner is mounted and which generation is current.
#[derive(Debug, Default)]
pub struct MountScope {
    current: u64,
    mounted: bool,
}

impl MountScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new mount and returns its generation.
    pub fn mount(&mut self) -> Generation {
        self.current += 1;
        self.mounted = true;
        Generation(self.current)
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// `true` only while mounted and only for the latest generation.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.mounted && generation.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::{Generation, LoadState, MountScope, UnavailableReason};

    #[test]
    fn fail_releases_ready_handle() {
        let mut state: LoadState<&str> = LoadState::Ready("map");
        assert_eq!(state.ready(), Some(&"map"));
        let released = state.fail(UnavailableReason::Cancelled);
        assert_eq!(released, Some("map"));
        assert_eq!(state.unavailable(), Some(&UnavailableReason::Cancelled));
        assert!(!state.is_ready());
    }

    #[test]
    fn fail_from_loading_releases_nothing() {
        let mut state: LoadState<u8> = LoadState::default();
        assert!(state.is_loading());
        assert_eq!(state.fail(UnavailableReason::Failed("404".into())), None);
    }

    #[test]
    fn stale_generations_are_not_current() {
        let mut scope = MountScope::new();
        let first = scope.mount();
        assert!(scope.is_current(first));

        let second = scope.mount();
        assert!(!scope.is_current(first));
        assert!(scope.is_current(second));

        scope.unmount();
        assert!(!scope.is_current(second));
        assert!(!scope.is_current(Generation(0)));
    }
}
