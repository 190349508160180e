//! Command dispatcher.
//!
//! Drains the group-command slots once per tick and turns each pending
//! command into actuator calls.
//!
//! - Legacy commands carry a one-byte mask; every set bit in 0..=6 names an
//!   [`ActionGroup`]. Stage is special: activating or toggling it also
//!   advances to the next stage, as a second, separate actuator call.
//! - Custom commands carry a list of group indices, applied last byte
//!   first. Groups 1..=10 go to the simulation, 11..=250 to the extended
//!   backend when one is present. Anything else is silently ignored.

use log::debug;

use crate::app::commands::GroupAction;
use crate::app::ports::ActuatorPort;
use crate::bitmask::{ActionGroup, EXTENDED_CUSTOM_GROUPS, NATIVE_CUSTOM_GROUPS};
use crate::extended::ExtendedGroups;
use crate::link::channels::CommandSlots;

const ACTIONS: [GroupAction; 3] = [
    GroupAction::Activate,
    GroupAction::Deactivate,
    GroupAction::Toggle,
];

/// Apply a legacy action-group mask. Returns the number of groups addressed.
pub fn apply_action_mask(act: &mut impl ActuatorPort, action: GroupAction, mask: u8) -> usize {
    let mut count = 0;
    for group in ActionGroup::in_mask(mask) {
        count += 1;
        match action {
            GroupAction::Activate => {
                debug!("Dispatch: activate {}", group);
                act.set_action_group(group, true);
                if group == ActionGroup::Stage {
                    act.activate_next_stage();
                }
            }
            GroupAction::Deactivate => {
                debug!("Dispatch: deactivate {}", group);
                act.set_action_group(group, false);
            }
            GroupAction::Toggle => {
                debug!("Dispatch: toggle {}", group);
                act.toggle_action_group(group);
                if group == ActionGroup::Stage {
                    act.activate_next_stage();
                }
            }
        }
    }
    count
}

/// Apply a custom-group command to each listed index, last first.
pub fn apply_custom_groups(
    act: &mut impl ActuatorPort,
    ext: &mut ExtendedGroups,
    action: GroupAction,
    groups: &[u8],
) {
    for &group in groups.iter().rev() {
        if NATIVE_CUSTOM_GROUPS.contains(&group) {
            debug!("Dispatch: {:?} custom group {}", action, group);
            match action {
                GroupAction::Activate => act.set_custom_group(group, true),
                GroupAction::Deactivate => act.set_custom_group(group, false),
                GroupAction::Toggle => act.toggle_custom_group(group),
            }
        } else if EXTENDED_CUSTOM_GROUPS.contains(&group) {
            let done = match action {
                GroupAction::Activate => ext.set_group(group, true),
                GroupAction::Deactivate => ext.set_group(group, false),
                GroupAction::Toggle => ext.toggle_group(group),
            };
            debug!(
                "Dispatch: {:?} extended group {} ({})",
                action,
                group,
                if done { "applied" } else { "ignored" }
            );
        } else {
            debug!("Dispatch: custom group {} out of range, ignored", group);
        }
    }
}

/// Drain the three legacy slots and apply whatever was pending.
pub fn dispatch_action_groups(slots: &CommandSlots, act: &mut impl ActuatorPort) {
    for action in ACTIONS {
        if let Some(mask) = slots.action(action).drain() {
            apply_action_mask(act, action, mask);
        }
    }
}

/// Drain the three custom-group slots and apply whatever was pending.
pub fn dispatch_custom_groups(
    slots: &CommandSlots,
    act: &mut impl ActuatorPort,
    ext: &mut ExtendedGroups,
) {
    for action in ACTIONS {
        if let Some(groups) = slots.custom(action).drain() {
            apply_custom_groups(act, ext, action, &groups);
        }
    }
}
