use crate::Identifier;

/// Namespace of every custom channel this protocol defines
pub const CHANNEL_NAMESPACE: &str = "facade";

/// Custom payload channels, opaque to the base protocol
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomChannel {
    /// A single virtualized cell
    CellUpdate,
    /// A batch of virtualized cells inside one section
    SectionUpdate,
    /// A page of synthetic content-type registry entries
    ContentRegistry,
    /// A page of synthetic state registry entries
    StateRegistry,
    /// The native client brand channel
    Brand,
}

impl CustomChannel {
    pub const ALL: [CustomChannel; 5] = [
        CustomChannel::CellUpdate,
        CustomChannel::SectionUpdate,
        CustomChannel::ContentRegistry,
        CustomChannel::StateRegistry,
        CustomChannel::Brand,
    ];

    pub fn identifier(&self) -> Identifier {
        match self {
            CustomChannel::CellUpdate => Identifier::new(CHANNEL_NAMESPACE, "cell/update"),
            CustomChannel::SectionUpdate => {
                Identifier::new(CHANNEL_NAMESPACE, "cell/section_update")
            }
            CustomChannel::ContentRegistry => {
                Identifier::new(CHANNEL_NAMESPACE, "registry/content")
            }
            CustomChannel::StateRegistry => Identifier::new(CHANNEL_NAMESPACE, "registry/state"),
            CustomChannel::Brand => Identifier::new("minecraft", "brand"),
        }
    }

    pub fn from_identifier(identifier: &Identifier) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.identifier() == *identifier)
    }
}
