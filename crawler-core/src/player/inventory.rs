//! Inventory, equipment and shop mutators.
//!
//! These are the calls the menu/inventory UI makes back into the simulation.
//! Each one either fully applies or is rejected with an [`ActionError`]; the
//! `GameWorld` wrappers also surface rejections as floating feedback.

use bevy::math::Vec2;
use rand::Rng;
use tracing::debug;

use super::stats::recalculate_player_stats;
use super::Player;
use crate::error::ActionError;
use crate::loot::shop::shop_catalog;
use crate::loot::{EquipSlot, GroundItem, Item, StatType};
use crate::world::{GameEvent, GameWorld};

/// Random scatter applied to dropped items, in pixels either way
const DROP_SCATTER: f32 = 25.0;

impl Player {
    /// Slot an item goes to when the caller names none.
    ///
    /// Rings try RING1, then RING2, and otherwise replace RING1.
    pub fn infer_slot(&self, item: &Item) -> EquipSlot {
        if !item.slot.is_ring() {
            return item.slot;
        }
        if !self.equipment.is_occupied(EquipSlot::Ring1) {
            EquipSlot::Ring1
        } else if !self.equipment.is_occupied(EquipSlot::Ring2) {
            EquipSlot::Ring2
        } else {
            EquipSlot::Ring1
        }
    }

    fn target_slot(&self, item: &Item, target: Option<EquipSlot>) -> Result<EquipSlot, ActionError> {
        match target {
            Some(slot) if item.slot.accepts(slot) => Ok(slot),
            Some(slot) => Err(ActionError::IncompatibleSlot {
                item: item.name.clone(),
                slot,
            }),
            None => Ok(self.infer_slot(item)),
        }
    }

    /// Move an inventory item into a slot; the previous occupant takes its place
    pub fn equip_from_inventory(
        &mut self,
        item_id: u64,
        target: Option<EquipSlot>,
    ) -> Result<EquipSlot, ActionError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(ActionError::ItemNotFound(item_id))?;
        let slot = self.target_slot(&self.inventory[index], target)?;

        let item = self.inventory.remove(index);
        if let Some(previous) = self.equipment.replace(slot, item) {
            self.inventory.push(previous);
        }
        recalculate_player_stats(self);
        Ok(slot)
    }

    /// Equip an item that is not in the inventory (e.g. straight off the ground).
    ///
    /// Rejected when the displaced item would not fit in the inventory.
    pub fn equip_item(&mut self, item: Item) -> Result<EquipSlot, (ActionError, Item)> {
        let slot = self.infer_slot(&item);
        if self.equipment.is_occupied(slot) && self.inventory_full() {
            return Err((ActionError::InventoryFull, item));
        }
        if let Some(previous) = self.equipment.replace(slot, item) {
            self.inventory.push(previous);
        }
        recalculate_player_stats(self);
        Ok(slot)
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        if !self.equipment.is_occupied(slot) {
            return Err(ActionError::EmptySlot(slot));
        }
        if self.inventory_full() {
            return Err(ActionError::InventoryFull);
        }
        if let Some(item) = self.equipment.take(slot) {
            self.inventory.push(item);
        }
        recalculate_player_stats(self);
        Ok(())
    }

    pub fn take_from_inventory(&mut self, item_id: u64) -> Result<Item, ActionError> {
        let index = self
            .inventory
            .iter()
            .position(|i| i.id == item_id)
            .ok_or(ActionError::ItemNotFound(item_id))?;
        Ok(self.inventory.remove(index))
    }

    /// Store an item; hands it back when the inventory is full
    pub fn store(&mut self, item: Item) -> Result<(), Item> {
        if self.inventory_full() {
            return Err(item);
        }
        self.inventory.push(item);
        Ok(())
    }
}

impl GameWorld {
    /// Surface a rejection to the player and pass it through
    pub(crate) fn report<T>(&mut self, result: Result<T, ActionError>) -> Result<T, ActionError> {
        if let Err(err) = &result {
            debug!(error = %err, "action rejected");
            self.feedback(err.to_string(), "#ef4444");
            let event = match err {
                ActionError::InventoryFull => GameEvent::InventoryFull,
                ActionError::WeaponRequired => GameEvent::WeaponRequired,
                other => GameEvent::FloatingFeedback(other.to_string()),
            };
            self.emit(event);
        }
        result
    }

    fn scatter_near_player(&mut self) -> Vec2 {
        let offset = Vec2::new(
            self.rng().gen_range(-DROP_SCATTER..DROP_SCATTER),
            self.rng().gen_range(-DROP_SCATTER..DROP_SCATTER),
        );
        self.player.pos + offset
    }

    pub fn upgrade_attribute(&mut self, stat: StatType) -> Result<(), ActionError> {
        let result = self.player.upgrade_attribute(stat);
        self.report(result)
    }

    pub fn equip_from_inventory(
        &mut self,
        item_id: u64,
        target: Option<EquipSlot>,
    ) -> Result<EquipSlot, ActionError> {
        let result = self.player.equip_from_inventory(item_id, target);
        self.report(result)
    }

    /// Equip a ground item directly, skipping the inventory
    pub fn equip_from_ground(&mut self, item_id: u64) -> Result<EquipSlot, ActionError> {
        let Some(index) = self.items.iter().position(|g| g.item.id == item_id) else {
            return self.report(Err(ActionError::ItemNotFound(item_id)));
        };
        let ground = self.items.remove(index);
        match self.player.equip_item(ground.item) {
            Ok(slot) => Ok(slot),
            Err((err, item)) => {
                self.items.insert(index, GroundItem { pos: ground.pos, item });
                self.report(Err(err))
            }
        }
    }

    pub fn unequip(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        let result = self.player.unequip(slot);
        self.report(result)
    }

    /// Drop an inventory item at the player's feet
    pub fn drop_item(&mut self, item_id: u64) -> Result<(), ActionError> {
        let result = self.player.take_from_inventory(item_id);
        let item = self.report(result)?;
        let pos = self.scatter_near_player();
        self.items.push(GroundItem { pos, item });
        Ok(())
    }

    /// Drop an equipped item straight to the ground
    pub fn drop_equipped(&mut self, slot: EquipSlot) -> Result<(), ActionError> {
        let Some(item) = self.player.equipment.take(slot) else {
            return self.report(Err(ActionError::EmptySlot(slot)));
        };
        recalculate_player_stats(&mut self.player);
        let pos = self.scatter_near_player();
        self.items.push(GroundItem { pos, item });
        Ok(())
    }

    /// Move a ground item into the inventory
    pub fn pickup_item(&mut self, item_id: u64) -> Result<(), ActionError> {
        let Some(index) = self.items.iter().position(|g| g.item.id == item_id) else {
            return self.report(Err(ActionError::ItemNotFound(item_id)));
        };
        if self.player.inventory_full() {
            return self.report(Err(ActionError::InventoryFull));
        }
        let ground = self.items.remove(index);
        let (name, color) = (ground.item.name.clone(), ground.item.color.clone());
        if let Err(item) = self.player.store(ground.item) {
            self.items.insert(index, GroundItem { pos: ground.pos, item });
            return self.report(Err(ActionError::InventoryFull));
        }
        self.feedback(format!("+ {name}"), &color);
        Ok(())
    }

    /// Buy a copy of a catalog item with score
    pub fn buy(&mut self, catalog_index: usize) -> Result<u64, ActionError> {
        let Some(template) = shop_catalog().into_iter().nth(catalog_index) else {
            return self.report(Err(ActionError::ItemNotFound(catalog_index as u64)));
        };
        if self.score < template.price {
            return self.report(Err(ActionError::InsufficientFunds {
                have: self.score,
                need: template.price,
            }));
        }
        if self.player.inventory_full() {
            return self.report(Err(ActionError::InventoryFull));
        }
        let id = self.ids.next_id();
        self.score -= template.price;
        self.player.inventory.push(Item { id, ..template });
        Ok(id)
    }

    /// Sell an inventory item for half its price
    pub fn sell(&mut self, item_id: u64) -> Result<u64, ActionError> {
        let result = self.player.take_from_inventory(item_id);
        let item = self.report(result)?;
        let gold = item.sell_price();
        self.score += gold;
        Ok(gold)
    }

    pub fn toggle_inventory(&mut self) -> bool {
        self.player.inventory_open = !self.player.inventory_open;
        self.player.inventory_open
    }
}
