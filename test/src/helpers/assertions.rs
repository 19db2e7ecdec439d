/// Assert that a client received no virtualization packet at all
#[macro_export]
macro_rules! assert_no_virtual_packets {
    ($packets:expr) => {
        for packet in $packets.iter() {
            if let Some(payload) = packet.as_custom_payload() {
                assert!(
                    payload.channel.namespace() != facade_shared::CHANNEL_NAMESPACE,
                    "Virtualization packet on {} reached a peer without the capability",
                    payload.channel
                );
            }
        }
    };
}

/// Assert that the last packet of a batch is a disconnect with the given
/// translation key
#[macro_export]
macro_rules! assert_disconnected_with {
    ($packets:expr, $key:expr) => {
        match $packets.last() {
            Some(facade_shared::ClientboundPacket::Disconnect {
                reason: facade_shared::Text::Translatable(key),
            }) => assert_eq!(key, $key),
            other => panic!("Expected a translatable disconnect, got {:?}", other),
        }
    };
}
