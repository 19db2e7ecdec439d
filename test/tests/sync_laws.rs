/// Tests for registry pagination, cell packing and the section diff cache,
/// observed from the client side of real connections.

use facade_server::REGISTRY_PAGE_SIZE;
use facade_shared::{
    CellPos, CellUpdatePacket, Chunk, ChunkPos, CustomChannel, LocalPos, RegistryKind,
    SectionPos, NO_RAW_ID,
};
use proptest::prelude::*;

use facade_test::{
    assert_no_virtual_packets, helpers::test_server::test_config, TestContent, TestServer,
};

fn server_with_states(states: usize) -> (TestServer, TestContent) {
    let (content, registry) = TestContent::with_synthetic_states(states);
    (TestServer::new(test_config(false), registry), content)
}

fn page_lengths(server: &mut TestServer) -> (Vec<usize>, Vec<usize>) {
    let client = server.join_capable(1);
    server.server.sync_registries(&client.key).unwrap();

    let pages = client.drain_registry_pages();
    let lengths = |kind: RegistryKind| {
        pages
            .iter()
            .filter(|page| page.kind == kind)
            .map(|page| page.entries.len())
            .collect::<Vec<_>>()
    };
    (lengths(RegistryKind::Content), lengths(RegistryKind::State))
}

// Pagination

#[test]
fn page_size_matches_default() {
    assert_eq!(REGISTRY_PAGE_SIZE, 61);
}

#[test]
fn hundred_thirty_entries_split_into_three_pages() {
    let (mut server, _) = server_with_states(130);
    let (content, states) = page_lengths(&mut server);
    assert_eq!(content, vec![61, 61, 8]);
    assert_eq!(states, vec![61, 61, 8]);
}

#[test]
fn sixty_entries_fit_one_page() {
    let (mut server, _) = server_with_states(60);
    let (content, states) = page_lengths(&mut server);
    assert_eq!(content, vec![60]);
    assert_eq!(states, vec![60]);
}

#[test]
fn exact_page_leaves_no_empty_trailer() {
    let (mut server, _) = server_with_states(61);
    let (content, states) = page_lengths(&mut server);
    assert_eq!(content, vec![61]);
    assert_eq!(states, vec![61]);
}

#[test]
fn one_past_a_page_spills_a_single_entry() {
    let (mut server, _) = server_with_states(62);
    let (content, states) = page_lengths(&mut server);
    assert_eq!(content, vec![61, 1]);
    assert_eq!(states, vec![61, 1]);
}

#[test]
fn oversized_page_size_is_capped() {
    let (content, registry) = TestContent::with_synthetic_states(130);
    let mut config = test_config(false);
    config.sync.page_size = 100;
    let mut server = TestServer::new(config, registry);
    assert_eq!(server.server.sync_builder().page_size(), REGISTRY_PAGE_SIZE);
    assert_eq!(content.synthetic.len(), 130);

    let (content_pages, state_pages) = page_lengths(&mut server);
    assert_eq!(content_pages, vec![61, 61, 8]);
    assert_eq!(state_pages, vec![61, 61, 8]);
}

#[test]
fn smaller_page_size_is_honored() {
    let (_, registry) = TestContent::with_synthetic_states(25);
    let mut config = test_config(false);
    config.sync.page_size = 10;
    let mut server = TestServer::new(config, registry);

    let (content_pages, state_pages) = page_lengths(&mut server);
    assert_eq!(content_pages, vec![10, 10, 5]);
    assert_eq!(state_pages, vec![10, 10, 5]);
}

#[test]
fn content_pages_precede_state_pages() {
    let (mut server, _) = server_with_states(70);
    let client = server.join_capable(1);
    server.server.sync_registries(&client.key).unwrap();

    let kinds: Vec<RegistryKind> = client
        .drain_registry_pages()
        .iter()
        .map(|page| page.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            RegistryKind::Content,
            RegistryKind::Content,
            RegistryKind::State,
            RegistryKind::State
        ]
    );
}

#[test]
fn state_records_carry_raw_ids_in_registration_order() {
    let (mut server, content) = server_with_states(3);
    let client = server.join_capable(1);
    server.server.sync_registries(&client.key).unwrap();

    let registry = server.server.registry();
    let state_entries: Vec<u32> = client
        .drain_registry_pages()
        .into_iter()
        .filter(|page| page.kind == RegistryKind::State)
        .flat_map(|page| page.entries)
        .map(|entry| entry.raw_index)
        .collect();
    let expected: Vec<u32> = content
        .synthetic
        .iter()
        .map(|state| registry.raw_id(*state))
        .collect();
    assert_eq!(state_entries, expected);
    assert_eq!(expected, vec![1, 2, 3]);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn pages_are_full_except_the_last(states in 1usize..200) {
        let (mut server, _) = server_with_states(states);
        let (content, state_pages) = page_lengths(&mut server);

        for pages in [content, state_pages] {
            prop_assert_eq!(pages.len(), (states + REGISTRY_PAGE_SIZE - 1) / REGISTRY_PAGE_SIZE);
            prop_assert_eq!(pages.iter().sum::<usize>(), states);
            let (last, full) = pages.split_last().unwrap();
            prop_assert!(full.iter().all(|len| *len == REGISTRY_PAGE_SIZE));
            prop_assert!(*last > 0 && *last <= REGISTRY_PAGE_SIZE);
        }
    }
}

// Packing

#[test]
fn section_update_packs_raw_id_above_local_position() {
    let (mut server, content) = server_with_states(4);
    let client = server.join_capable(1);

    let positions = [
        LocalPos::new(0, 0, 0),
        LocalPos::new(15, 15, 15),
        LocalPos::new(3, 9, 12),
    ];
    let states = [content.synthetic[0], content.synthetic[3], content.stone];
    let section = SectionPos::new(-2, 4, 7);
    assert_eq!(
        server
            .server
            .send_section_update(&client.key, section, &positions, &states),
        Ok(true)
    );

    let updates = client.drain_section_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].section, section);

    let registry = server.server.registry();
    for ((cell, local), state) in updates[0].cells.iter().zip(positions).zip(states) {
        let raw_id = registry.raw_id(state);
        assert_eq!(cell.value(), ((raw_id as u64) << 12) | local.packed() as u64);
        assert_eq!(cell.local(), local);
        assert_eq!(cell.raw_id(), raw_id);
    }
    // built-in states travel as the sentinel
    assert_eq!(updates[0].cells[2].raw_id(), NO_RAW_ID);
}

#[test]
fn single_cell_update_names_the_raw_id() {
    let (mut server, content) = server_with_states(2);
    let client = server.join_capable(1);
    let pos = CellPos::new(100, -30, -7);

    assert_eq!(
        server
            .server
            .send_cell_update(&client.key, pos, content.synthetic[1]),
        Ok(true)
    );

    let packets = client.drain_channel(CustomChannel::CellUpdate);
    assert_eq!(packets.len(), 1);
    let payload = packets[0].as_custom_payload().unwrap();
    let update = CellUpdatePacket::from_payload(payload).unwrap();
    assert_eq!(update, CellUpdatePacket { pos, raw_id: 2 });
}

// Capability gate

#[test]
fn incapable_peer_is_never_sent_virtual_packets() {
    let (mut server, content) = server_with_states(3);
    let client = server.join_incapable(1);

    let mut chunk = Chunk::new(
        ChunkPos::new(0, 0),
        0,
        2,
        content.air,
        server.server.registry(),
    );
    chunk.set_state(
        &CellPos::new(1, 1, 1),
        content.synthetic[0],
        server.server.registry(),
    );

    assert_eq!(
        server
            .server
            .send_cell_update(&client.key, CellPos::new(0, 0, 0), content.synthetic[0]),
        Ok(false)
    );
    assert_eq!(
        server.server.send_section_update(
            &client.key,
            SectionPos::new(0, 0, 0),
            &[LocalPos::new(1, 1, 1)],
            &[content.synthetic[1]],
        ),
        Ok(false)
    );
    assert_eq!(server.server.send_chunk(&client.key, &chunk), Ok(0));
    assert_eq!(server.server.sync_registries(&client.key), Ok(0));

    let packets = client.drain();
    assert!(packets.is_empty());
    assert_no_virtual_packets!(packets);
    // the gate short-circuits before the cache is consulted
    assert!(!chunk.diff_cache().is_built());
}

#[test]
#[should_panic]
fn mismatched_section_update_lengths_panic() {
    let (mut server, content) = server_with_states(1);
    let client = server.join_capable(1);

    let _ = server.server.send_section_update(
        &client.key,
        SectionPos::new(0, 0, 0),
        &[LocalPos::new(0, 0, 0), LocalPos::new(1, 0, 0)],
        &[content.synthetic[0]],
    );
}

// Section diff cache

fn chunk_with_gems(server: &TestServer, content: &TestContent) -> Chunk {
    let registry = server.server.registry();
    let mut chunk = Chunk::new(ChunkPos::new(2, -1), 0, 4, content.air, registry);
    chunk.set_state(&CellPos::new(32, 3, -16), content.synthetic[0], registry);
    chunk.set_state(&CellPos::new(33, 3, -16), content.synthetic[1], registry);
    chunk.set_state(&CellPos::new(40, 40, -10), content.synthetic[2], registry);
    chunk.set_state(&CellPos::new(41, 20, -11), content.stone, registry);
    chunk
}

#[test]
fn chunk_diff_is_identical_for_every_capable_peer() {
    let (mut server, content) = server_with_states(3);
    let first = server.join_capable(1);
    let second = server.join_capable(2);
    let chunk = chunk_with_gems(&server, &content);

    assert_eq!(server.server.send_chunk(&first.key, &chunk), Ok(2));
    assert!(chunk.diff_cache().is_built());
    assert_eq!(server.server.send_chunk(&second.key, &chunk), Ok(2));

    let first_packets = first.drain();
    assert_eq!(first_packets.len(), 2);
    assert_eq!(first_packets, second.drain());
}

#[test]
fn chunk_diff_lists_only_sections_with_synthetic_cells() {
    let (mut server, content) = server_with_states(3);
    let client = server.join_capable(1);
    let chunk = chunk_with_gems(&server, &content);

    server.server.send_chunk(&client.key, &chunk).unwrap();
    let updates = client.drain_section_updates();

    let sections: Vec<SectionPos> = updates.iter().map(|update| update.section).collect();
    assert_eq!(
        sections,
        vec![SectionPos::new(2, 0, -1), SectionPos::new(2, 2, -1)]
    );
    assert_eq!(updates[0].cells.len(), 2);
    assert_eq!(updates[1].cells.len(), 1);
    assert!(updates
        .iter()
        .flat_map(|update| update.cells.iter())
        .all(|cell| cell.raw_id() != NO_RAW_ID));
}

#[test]
fn chunk_mutation_rebuilds_the_diff() {
    let (mut server, content) = server_with_states(3);
    let client = server.join_capable(1);
    let mut chunk = chunk_with_gems(&server, &content);

    server.server.send_chunk(&client.key, &chunk).unwrap();
    client.drain();

    chunk.set_state(
        &CellPos::new(35, 60, -2),
        content.synthetic[1],
        server.server.registry(),
    );
    assert!(!chunk.diff_cache().is_built());
    assert_eq!(server.server.send_chunk(&client.key, &chunk), Ok(3));
    assert_eq!(client.drain_section_updates().len(), 3);
}

#[test]
fn chunk_without_synthetic_cells_caches_an_empty_diff() {
    let (mut server, content) = server_with_states(1);
    let client = server.join_capable(1);
    let chunk = Chunk::new(
        ChunkPos::new(0, 0),
        -4,
        8,
        content.stone,
        server.server.registry(),
    );

    assert_eq!(server.server.send_chunk(&client.key, &chunk), Ok(0));
    assert!(chunk.diff_cache().is_built());
    assert_eq!(chunk.diff_cache().get().map(|packets| packets.len()), Some(0));
    assert!(client.drain().is_empty());
}
