//! Integration tests: router → slots/queue → Bridge::tick → ports.

use simpit::app::commands::GroupAction;
use simpit::app::events::{Scene, StageDeltaV, TotalDeltaV, VesselChange};
use simpit::bitmask::ActionGroup;
use simpit::channel::{ChannelId, common, inbound, outbound};
use simpit::extended::ExtendedGroups;
use simpit::link::Routed;
use simpit::registry::PeerId;
use simpit::{Bridge, BridgeConfig};

use super::mock_sim::{MockBackend, MockLink, MockSim, Sent, SimCall};

const P1: PeerId = PeerId(1);
const P2: PeerId = PeerId(2);

fn started(ext: ExtendedGroups) -> Bridge {
    let mut bridge = Bridge::new(BridgeConfig::default(), ext);
    bridge.start();
    bridge
}

fn register(bridge: &Bridge, peer: PeerId, channel: ChannelId) {
    let routed = bridge
        .router()
        .on_frame(peer, inbound::REGISTER_HANDLER, &[channel.0])
        .unwrap();
    assert_eq!(routed, Routed::Queued);
}

// ── Subscriptions and change detection ───────────────────────

#[test]
fn registration_gets_snapshot_then_changes_only() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    sim.action_groups.insert(ActionGroup::Gear as u8);
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    bridge.tick(&mut sim, &mut link);

    assert_eq!(
        link.take(),
        vec![Sent {
            peer: P1,
            channel: outbound::ACTION_GROUPS,
            payload: vec![0b10],
        }]
    );

    sim.action_groups.insert(ActionGroup::Sas as u8);
    bridge.tick(&mut sim, &mut link);
    assert_eq!(link.take()[0].payload, vec![0b1_0010]);
}

#[test]
fn no_subscribers_means_no_simulation_reads() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    for _ in 0..5 {
        bridge.tick(&mut sim, &mut link);
    }

    assert_eq!(sim.reads.get(), 0);
    assert_eq!(sim.delta_v_lookups.get(), 0);
    assert!(link.sent.is_empty());
    assert_eq!(bridge.tick_count(), 5);
}

#[test]
fn second_peer_triggers_resend_to_all() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    bridge.tick(&mut sim, &mut link);
    assert_eq!(link.take().len(), 1);

    register(&bridge, P2, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    let peers: Vec<PeerId> = link.take().into_iter().map(|s| s.peer).collect();
    assert_eq!(peers, vec![P1, P2]);
}

#[test]
fn duplicate_registration_then_single_deregistration() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::ACTION_GROUPS);
    register(&bridge, P1, outbound::ACTION_GROUPS);
    bridge
        .router()
        .on_frame(P1, inbound::DEREGISTER_HANDLER, &[outbound::ACTION_GROUPS.0])
        .unwrap();
    bridge.tick(&mut sim, &mut link);

    assert!(!bridge.registry().has_subscribers(outbound::ACTION_GROUPS));
    assert!(link.sent.is_empty());
}

#[test]
fn no_vessel_emits_zero_once() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    sim.vessel = false;
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::ACTION_GROUPS);
    register(&bridge, P1, outbound::CUSTOM_ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    bridge.tick(&mut sim, &mut link);

    let sent = link.take();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].payload, vec![0x00]);
    assert_eq!(sent[1].payload, vec![0u8; 32]);

    sim.vessel = true;
    sim.action_groups.insert(ActionGroup::Brakes as u8);
    bridge.tick(&mut sim, &mut link);
    let ag = link.on_channel(outbound::ACTION_GROUPS);
    assert_eq!(ag.len(), 1);
    assert_eq!(ag[0].payload, vec![ActionGroup::Brakes.mask()]);
}

#[test]
fn failed_peer_does_not_cause_repeats_for_others() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    sim.action_groups.insert(ActionGroup::Gear as u8);
    let mut link = MockLink::new();
    link.refuse = Some(P2);

    register(&bridge, P1, outbound::ACTION_GROUPS);
    register(&bridge, P2, outbound::ACTION_GROUPS);
    for _ in 0..3 {
        bridge.tick(&mut sim, &mut link);
    }

    assert_eq!(
        link.take(),
        vec![Sent {
            peer: P1,
            channel: outbound::ACTION_GROUPS,
            payload: vec![0b10],
        }]
    );
    assert!(!bridge.action_groups().detector().resend_pending());
}

#[test]
fn disconnect_drops_every_subscription() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::ACTION_GROUPS);
    register(&bridge, P1, outbound::CUSTOM_ACTION_GROUPS);
    register(&bridge, P2, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);

    bridge.router().on_disconnect(P1);
    bridge.tick(&mut sim, &mut link);

    assert!(!bridge.registry().has_subscribers(outbound::CUSTOM_ACTION_GROUPS));
    assert_eq!(bridge.registry().subscribers(outbound::ACTION_GROUPS), &[P2]);
}

// ── Command dispatch ──────────────────────────────────────────

#[test]
fn stage_and_gear_activation() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    bridge
        .router()
        .on_frame(P1, inbound::ACTION_GROUP_ACTIVATE, &[0b0000011])
        .unwrap();
    bridge.tick(&mut sim, &mut link);

    assert_eq!(
        sim.take_calls(),
        vec![
            SimCall::SetAction(ActionGroup::Stage, true),
            SimCall::NextStage,
            SimCall::SetAction(ActionGroup::Gear, true),
        ]
    );

    bridge.tick(&mut sim, &mut link);
    assert!(sim.calls.is_empty());
}

#[test]
fn back_to_back_commands_keep_only_the_last() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    let router = bridge.router();

    router.on_frame(P1, inbound::ACTION_GROUP_TOGGLE, &[ActionGroup::Rcs.mask()]).unwrap();
    router.on_frame(P2, inbound::ACTION_GROUP_TOGGLE, &[ActionGroup::Sas.mask()]).unwrap();
    bridge.tick(&mut sim, &mut link);

    assert_eq!(sim.calls, vec![SimCall::ToggleAction(ActionGroup::Sas)]);
}

#[test]
fn custom_groups_split_between_native_and_backend() {
    let (backend, state) = MockBackend::shared();
    state.lock().unwrap().active.insert(12);
    let mut bridge = started(ExtendedGroups::probe(Some(backend)));
    let mut sim = MockSim::new();
    sim.custom_groups.insert(3);
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::CUSTOM_ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    let sent = link.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload.len(), 32);
    assert_eq!(sent[0].payload[0], 1 << 3);
    assert_eq!(sent[0].payload[1], 1 << 4);

    bridge
        .router()
        .on_frame(P1, inbound::CUSTOM_GROUP_ENABLE, &[2, 12, 0])
        .unwrap();
    bridge.tick(&mut sim, &mut link);

    assert_eq!(sim.take_calls(), vec![SimCall::SetCustom(2, true)]);
    assert_eq!(state.lock().unwrap().calls, vec![(12, Some(true))]);
}

#[test]
fn backend_failure_degrades_to_native_groups() {
    let (backend, state) = MockBackend::shared();
    state.lock().unwrap().active.insert(200);
    let mut bridge = started(ExtendedGroups::probe(Some(backend)));
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::CUSTOM_ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    assert_ne!(link.take()[0].payload[25], 0);

    state.lock().unwrap().fail = true;
    bridge.tick(&mut sim, &mut link);

    assert!(!bridge.extended().is_present());
    let sent = link.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].payload, vec![0u8; 32]);

    bridge
        .router()
        .on_frame(P1, inbound::CUSTOM_GROUP_TOGGLE, &[200, 1])
        .unwrap();
    bridge.tick(&mut sim, &mut link);
    assert_eq!(sim.calls, vec![SimCall::ToggleCustom(1)]);
}

// ── Echo, log, scene ──────────────────────────────────────────

#[test]
fn echo_reply_goes_to_requester() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    register(&bridge, P2, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    link.take();

    bridge.router().on_frame(P1, common::ECHO_REQUEST, b"ping").unwrap();
    bridge.tick(&mut sim, &mut link);

    assert_eq!(
        link.sent,
        vec![Sent {
            peer: P1,
            channel: common::ECHO_RESPONSE,
            payload: b"ping".to_vec(),
        }]
    );
}

#[test]
fn custom_log_posts_to_screen_with_header() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    bridge
        .router()
        .on_frame(P1, inbound::CUSTOM_LOG, &[2, b'h', b'i'])
        .unwrap();
    bridge.tick(&mut sim, &mut link);

    assert_eq!(sim.calls, vec![SimCall::Screen("Simpit : hi".into())]);
}

#[test]
fn scene_change_is_fired_to_subscribers() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    register(&bridge, P1, outbound::SCENE_CHANGE);
    bridge.tick(&mut sim, &mut link);

    assert!(!bridge.on_scene_change(Scene::NotFlight, &mut link));
    assert!(bridge.on_scene_change(Scene::Flight, &mut link));
    assert!(bridge.on_scene_change(Scene::NotFlight, &mut link));

    let bytes: Vec<u8> = link.take().into_iter().map(|s| s.payload[0]).collect();
    assert_eq!(bytes, vec![0x00, 0x01]);
}

#[test]
fn vessel_change_is_fired_to_subscribers() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    register(&bridge, P1, outbound::VESSEL_CHANGE);
    bridge.tick(&mut sim, &mut link);

    bridge.on_vessel_change(VesselChange::Undocking, &mut link);

    assert_eq!(
        link.take(),
        vec![Sent {
            peer: P1,
            channel: outbound::VESSEL_CHANGE,
            payload: vec![3],
        }]
    );
}

#[test]
fn delta_v_published_for_subscribers() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    sim.delta_v = Some((
        StageDeltaV {
            actual: 1200.0,
            asl: 1000.0,
            vacuum: 1300.0,
        },
        TotalDeltaV {
            actual: 3400.0,
            asl: 3000.0,
            vacuum: 3600.0,
        },
    ));
    let mut link = MockLink::new();

    register(&bridge, P1, outbound::DELTA_V);
    bridge.tick(&mut sim, &mut link);
    bridge.tick(&mut sim, &mut link);

    let sent = link.take();
    assert_eq!(sent.len(), 1);
    let mut expected = 1200.0f32.to_le_bytes().to_vec();
    expected.extend_from_slice(&3400.0f32.to_le_bytes());
    assert_eq!(sent[0].payload, expected);
    assert_eq!(sim.delta_v_lookups.get(), 2);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn tick_before_start_does_nothing() {
    let mut bridge = Bridge::new(BridgeConfig::default(), ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    assert_eq!(
        bridge.router().on_frame(P1, inbound::REGISTER_HANDLER, &[40]).unwrap(),
        Routed::Dropped
    );
    bridge.tick(&mut sim, &mut link);
    assert_eq!(bridge.tick_count(), 0);
}

#[test]
fn shutdown_releases_handlers_and_discards_pending() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    let router = bridge.router();

    router.on_frame(P1, inbound::ACTION_GROUP_ACTIVATE, &[0b1]).unwrap();
    bridge.shutdown();
    assert!(!bridge.is_started());
    assert_eq!(
        router.on_frame(P1, inbound::ACTION_GROUP_ACTIVATE, &[0b1]).unwrap(),
        Routed::Dropped
    );

    bridge.start();
    bridge.tick(&mut sim, &mut link);
    assert!(sim.calls.is_empty());
}

#[test]
fn restart_does_not_replay_late_deposit() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();

    bridge.shutdown();
    // A router that passed its handler check just before release.
    bridge
        .link()
        .slots()
        .action(GroupAction::Activate)
        .deposit(ActionGroup::Stage.mask());

    bridge.start();
    bridge.tick(&mut sim, &mut link);
    assert!(sim.calls.is_empty());
}

#[test]
fn disconnects_are_applied_while_stopped() {
    let mut bridge = started(ExtendedGroups::Absent);
    let mut sim = MockSim::new();
    let mut link = MockLink::new();
    register(&bridge, P1, outbound::ACTION_GROUPS);
    bridge.tick(&mut sim, &mut link);
    bridge.shutdown();

    let router = bridge.router();
    for _ in 0..3 {
        for _ in 0..10 {
            router.on_disconnect(P2);
        }
        bridge.tick(&mut sim, &mut link);
    }
    router.on_disconnect(P1);
    bridge.tick(&mut sim, &mut link);

    assert!(!bridge.registry().has_subscribers(outbound::ACTION_GROUPS));
    assert!(bridge.link().try_recv_control().is_none());
}
