pub mod sync_packet_builder;
