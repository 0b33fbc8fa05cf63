// ============================================================================
// spark-breakpoints - Node Flags
// Type and status bits carried by every node in the reactive graph
// ============================================================================

bitflags::bitflags! {
    /// Bitfield describing what a reactive node is and what state it is in.
    ///
    /// The low bits carry the node kind, the high bits carry its status.
    /// Exactly one of `CLEAN`, `DIRTY`, `MAYBE_DIRTY` is set at any time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        /// Writable signal.
        const SOURCE = 1 << 0;
        /// Cached computation; both a source and a reaction.
        const DERIVED = 1 << 1;
        /// Side-effecting reaction.
        const EFFECT = 1 << 2;
        /// Effect that runs ahead of ordinary effects in every flush.
        const RENDER_EFFECT = 1 << 3;

        /// Up to date.
        const CLEAN = 1 << 10;
        /// A direct dependency changed; must rerun.
        const DIRTY = 1 << 11;
        /// An upstream derived may have changed; check before rerunning.
        const MAYBE_DIRTY = 1 << 12;
        /// Currently executing.
        const UPDATING = 1 << 13;
        /// Disposed, never runs again.
        const DESTROYED = 1 << 14;
    }
}

impl NodeFlags {
    /// All status bits.
    pub const STATUS: NodeFlags = NodeFlags::CLEAN
        .union(NodeFlags::DIRTY)
        .union(NodeFlags::MAYBE_DIRTY);

    /// Replace the status bits, keeping everything else.
    pub fn with_status(self, status: NodeFlags) -> NodeFlags {
        self.difference(Self::STATUS).union(status)
    }

    /// True when the node needs to be brought up to date before use.
    pub fn is_stale(self) -> bool {
        self.intersects(NodeFlags::DIRTY | NodeFlags::MAYBE_DIRTY)
    }
}
