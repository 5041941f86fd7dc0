use scene::visibility::BlockId;

/// Independently re-rendered part of a page (`data-region="…"`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Region {
    Hero,
    Stats,
    Filters,
    Diagram,
    Records,
    Detail,
    /// Owned by the map library once mounted; never re-rendered.
    Map,
    Sources,
}

impl Region {
    pub const ALL: [Region; 8] = [
        Region::Hero,
        Region::Stats,
        Region::Filters,
        Region::Diagram,
        Region::Records,
        Region::Detail,
        Region::Map,
        Region::Sources,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Region::Hero => "hero",
            Region::Stats => "stats",
            Region::Filters => "filters",
            Region::Diagram => "diagram",
            Region::Records => "records",
            Region::Detail => "detail",
            Region::Map => "map",
            Region::Sources => "sources",
        }
    }

    pub fn parse(key: &str) -> Option<Region> {
        Region::ALL.into_iter().find(|r| r.key() == key)
    }
}

/// Reveal-on-scroll blocks, in page order. The stagger delay follows this order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Block {
    Hero,
    Stats,
    Section,
    Map,
    Sources,
}

impl Block {
    pub const ALL: [Block; 5] = [Block::Hero, Block::Stats, Block::Section, Block::Map, Block::Sources];

    pub fn id(self) -> BlockId {
        BlockId(self as u32)
    }

    pub fn from_id(id: BlockId) -> Option<Block> {
        Block::ALL.into_iter().find(|b| b.id() == id)
    }

    pub fn stagger_index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, Region};
    use scene::visibility::BlockId;

    #[test]
    fn keys_round_trip() {
        for r in Region::ALL {
            assert_eq!(Region::parse(r.key()), Some(r));
        }
        assert_eq!(Region::parse("footer"), None);
    }

    #[test]
    fn block_ids_follow_page_order() {
        assert_eq!(Block::Hero.id(), BlockId(0));
        assert_eq!(Block::Sources.id(), BlockId(4));
        assert_eq!(Block::from_id(BlockId(3)), Some(Block::Map));
        assert_eq!(Block::from_id(BlockId(9)), None);
    }
}
