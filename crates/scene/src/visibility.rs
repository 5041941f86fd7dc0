use std::collections::BTreeMap;

/// Typical fraction of a block that must be on screen before it reveals.
pub const DEFAULT_REVEAL_THRESHOLD: f32 = 0.15;

/// Whether the host can report viewport intersections at all.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObserverSupport {
    Available,
    /// Reveal animation is an enhancement: without an observer every block
    /// starts revealed.
    Unavailable,
}

/// One-shot latch: false until the observed ratio first reaches the
/// threshold, then true forever.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealLatch {
    threshold: f32,
    revealed: bool,
}

impl RevealLatch {
    pub fn new(threshold: f32, support: ObserverSupport) -> Self {
        Self {
            threshold: clamp_threshold(threshold),
            revealed: support == ObserverSupport::Unavailable,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Still worth observing; false once latched.
    pub fn is_observing(&self) -> bool {
        !self.revealed
    }

    /// Feeds an intersection ratio. Returns `true` only on the call that
    /// flips the latch; non-finite ratios count as 0.
    pub fn observe(&mut self, ratio: f32) -> bool {
        if self.revealed {
            return false;
        }
        let ratio = if ratio.is_finite() { ratio } else { 0.0 };
        if ratio >= self.threshold && ratio > 0.0 {
            self.revealed = true;
            return true;
        }
        false
    }
}

fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_finite() {
        threshold.clamp(0.0, 1.0)
    } else {
        DEFAULT_REVEAL_THRESHOLD
    }
}

/// Identifies one revealable block on a page (`data-reveal="N"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

/// Independent latches for every revealable block of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealSet {
    support: ObserverSupport,
    threshold: f32,
    latches: BTreeMap<BlockId, RevealLatch>,
}

impl RevealSet {
    pub fn new(support: ObserverSupport) -> Self {
        Self::with_threshold(support, DEFAULT_REVEAL_THRESHOLD)
    }

    pub fn with_threshold(support: ObserverSupport, threshold: f32) -> Self {
        Self {
            support,
            threshold: clamp_threshold(threshold),
            latches: BTreeMap::new(),
        }
    }

    pub fn support(&self) -> ObserverSupport {
        self.support
    }

    pub fn register(&mut self, block: BlockId) {
        let latch = RevealLatch::new(self.threshold, self.support);
        self.latches.entry(block).or_insert(latch);
    }

    /// Returns `true` when this observation revealed `block`; the caller
    /// should stop observing it. Unknown blocks are registered on the fly.
    pub fn observe(&mut self, block: BlockId, ratio: f32) -> bool {
        self.register(block);
        self.latches
            .get_mut(&block)
            .is_some_and(|latch| latch.observe(ratio))
    }

    /// Unregistered blocks read as revealed only when there is no observer.
    pub fn is_revealed(&self, block: BlockId) -> bool {
        match self.latches.get(&block) {
            Some(latch) => latch.is_revealed(),
            None => self.support == ObserverSupport::Unavailable,
        }
    }

    /// Blocks still waiting to be revealed, ascending.
    pub fn observing(&self) -> Vec<BlockId> {
        self.latches
            .iter()
            .filter(|(_, l)| l.is_observing())
            .map(|(b, _)| *b)
            .collect()
    }

    pub fn revealed_count(&self) -> usize {
        self.latches.values().filter(|l| l.is_revealed()).count()
    }
}

const REVEAL_OFFSET_PX: f32 = 24.0;
const REVEAL_STAGGER_MS: u32 = 80;
const REVEAL_DURATION_MS: u32 = 700;

/// Entrance transition for a block: hidden blocks sit lower and transparent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealStyle {
    pub opacity: f32,
    pub translate_y_px: f32,
    pub delay_ms: u32,
}

impl RevealStyle {
    pub fn for_state(revealed: bool, stagger_index: usize) -> Self {
        let delay_ms = REVEAL_STAGGER_MS.saturating_mul(stagger_index.min(8) as u32);
        if revealed {
            Self {
                opacity: 1.0,
                translate_y_px: 0.0,
                delay_ms,
            }
        } else {
            Self {
                opacity: 0.0,
                translate_y_px: REVEAL_OFFSET_PX,
                delay_ms,
            }
        }
    }

    pub fn to_css(&self) -> String {
        format!(
            "opacity:{};transform:translateY({}px);transition:opacity {REVEAL_DURATION_MS}ms ease {}ms, transform {REVEAL_DURATION_MS}ms ease {}ms",
            self.opacity, self.translate_y_px, self.delay_ms, self.delay_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockId, ObserverSupport, RevealLatch, RevealSet, RevealStyle};

    #[test]
    fn latch_flips_once_and_never_reverts() {
        let mut latch = RevealLatch::new(0.15, ObserverSupport::Available);
        let ratios = [0.0, 0.1, 0.2, 0.0, 1.0, 0.0, f32::NAN];
        let mut history = Vec::new();
        let mut flips = 0;
        for r in ratios {
            if latch.observe(r) {
                flips += 1;
            }
            history.push(latch.is_revealed());
        }
        assert_eq!(flips, 1);
        assert_eq!(history, vec![false, false, true, true, true, true, true]);
        assert!(!latch.is_observing());
    }

    #[test]
    fn missing_observer_fails_open() {
        let latch = RevealLatch::new(0.2, ObserverSupport::Unavailable);
        assert!(latch.is_revealed());

        let mut set = RevealSet::new(ObserverSupport::Unavailable);
        assert!(set.is_revealed(BlockId(3)));
        set.register(BlockId(3));
        assert!(set.is_revealed(BlockId(3)));
        assert!(set.observing().is_empty());
        assert!(!set.observe(BlockId(3), 1.0));
    }

    #[test]
    fn zero_ratio_never_reveals_even_with_zero_threshold() {
        let mut latch = RevealLatch::new(0.0, ObserverSupport::Available);
        assert!(!latch.observe(0.0));
        assert!(latch.observe(0.01));
    }

    #[test]
    fn thresholds_are_clamped() {
        assert_eq!(RevealLatch::new(3.0, ObserverSupport::Available).threshold(), 1.0);
        assert_eq!(RevealLatch::new(-1.0, ObserverSupport::Available).threshold(), 0.0);
        assert_eq!(
            RevealLatch::new(f32::NAN, ObserverSupport::Available).threshold(),
            super::DEFAULT_REVEAL_THRESHOLD
        );
    }

    #[test]
    fn blocks_latch_independently() {
        let mut set = RevealSet::with_threshold(ObserverSupport::Available, 0.1);
        for b in 0..3 {
            set.register(BlockId(b));
        }
        assert!(set.observe(BlockId(1), 0.5));
        assert!(!set.observe(BlockId(1), 0.9));
        assert!(set.is_revealed(BlockId(1)));
        assert!(!set.is_revealed(BlockId(0)));
        assert_eq!(set.observing(), vec![BlockId(0), BlockId(2)]);
        assert_eq!(set.revealed_count(), 1);
    }

    #[test]
    fn style_follows_latch_state() {
        let hidden = RevealStyle::for_state(false, 2);
        assert_eq!(hidden.opacity, 0.0);
        assert_eq!(hidden.translate_y_px, 24.0);
        assert_eq!(hidden.delay_ms, 160);
        let shown = RevealStyle::for_state(true, 20);
        assert_eq!(shown.opacity, 1.0);
        assert_eq!(shown.delay_ms, 640);
        assert!(shown.to_css().starts_with("opacity:1;transform:translateY(0px)"));
    }
}
