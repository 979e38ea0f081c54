use std::fmt::{Display, Formatter};

/// The template roles a `SwiftRender` can materialize.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum SlotKind {
    Index,
    Buffer,
    View,
    Partial,
}

impl SlotKind {
    pub fn maybe_from(s: &str) -> Option<Self> {
        match s {
            "index" => Some(SlotKind::Index),
            "buffer" => Some(SlotKind::Buffer),
            "view" => Some(SlotKind::View),
            "partial" => Some(SlotKind::Partial),
            _ => None
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Index => "index",
            SlotKind::Buffer => "buffer",
            SlotKind::View => "view",
            SlotKind::Partial => "partial",
        }
    }

    pub fn members() -> &'static [Self] {
        &[SlotKind::Index, SlotKind::Buffer, SlotKind::View, SlotKind::Partial]
    }

    /// Whether a status bound view (see `SwiftRender::find_bind`)
    /// replaces this slot.
    pub fn takes_bound_view(self) -> bool {
        match self {
            SlotKind::Index | SlotKind::Buffer => true,
            SlotKind::View | SlotKind::Partial => false,
        }
    }
}

impl Display for SlotKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
