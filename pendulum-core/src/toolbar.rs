//! Settings toolbar actions. Each action writes through the engine
//! interface and bumps the render counter.

use std::f64::consts::FRAC_PI_2;

use crate::constants::{BASE_SPEED, SPEED_MULTIPLIERS};
use crate::engine::SimulationEngine;
use crate::model::Integrator;
use crate::selection::SelectionState;

/// Index of the 1x rung in [`SPEED_MULTIPLIERS`].
const NORMAL_SPEED_RUNG: usize = 8;

#[derive(Clone, Debug)]
pub struct Toolbar {
    rung: usize,
}

impl Default for Toolbar {
    fn default() -> Self {
        Toolbar {
            rung: NORMAL_SPEED_RUNG,
        }
    }
}

impl Toolbar {
    /// Toolbar whose speed ladder matches the engine's current speed, or 1x
    /// if the speed is not on the ladder.
    pub fn for_engine<E: SimulationEngine + ?Sized>(engine: &E) -> Self {
        let multiplier = (engine.speed() / BASE_SPEED * 100.0).round() / 100.0;
        let rung = SPEED_MULTIPLIERS
            .iter()
            .position(|&m| m == multiplier)
            .unwrap_or(NORMAL_SPEED_RUNG);
        Toolbar { rung }
    }

    pub fn multiplier(&self) -> f64 {
        SPEED_MULTIPLIERS[self.rung]
    }

    pub fn rewind<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        self.set_rung(self.rung.saturating_sub(1), engine, selection);
    }

    pub fn fast_forward<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        let top = SPEED_MULTIPLIERS.len() - 1;
        self.set_rung((self.rung + 1).min(top), engine, selection);
    }

    /// Jump straight to `multiplier` if it is one of the ladder rungs.
    pub fn set_multiplier<E: SimulationEngine + ?Sized>(
        &mut self,
        multiplier: f64,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        match SPEED_MULTIPLIERS.iter().position(|&m| m == multiplier) {
            Some(rung) => {
                self.set_rung(rung, engine, selection);
                true
            }
            None => false,
        }
    }

    fn set_rung<E: SimulationEngine + ?Sized>(
        &mut self,
        rung: usize,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        self.rung = rung;
        engine.set_speed(self.multiplier() * BASE_SPEED);
        log::debug!("speed set to {}x", self.multiplier());
        selection.bump_render();
    }

    pub fn toggle_pause<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        let paused = !engine.is_paused();
        engine.set_paused(paused);
        log::info!("simulation {}", if paused { "paused" } else { "playing" });
        selection.bump_render();
        paused
    }

    /// Open or close the property editor. Opening pauses the engine so the
    /// chain can be picked and dragged.
    pub fn toggle_editor<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        let open = !selection.is_panel_open();
        if open {
            selection.open_panel();
            engine.set_paused(true);
        } else {
            selection.close_panel();
        }
        selection.bump_render();
        open
    }

    pub fn toggle_trails<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        let visible = !engine.trails_visible();
        engine.set_trails_visible(visible);
        selection.bump_render();
        visible
    }

    pub fn toggle_mass_calculation<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        let enabled = !engine.mass_calculation();
        engine.set_mass_calculation(enabled);
        selection.bump_render();
        enabled
    }

    pub fn toggle_energy_limiting<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) -> bool {
        let enabled = !engine.energy_limiting();
        engine.set_energy_limiting(enabled);
        selection.bump_render();
        enabled
    }

    pub fn set_integrator<E: SimulationEngine + ?Sized>(
        &self,
        integrator: Integrator,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        engine.set_integrator(integrator);
        log::info!("integrator set to {}", integrator.as_str());
        selection.bump_render();
    }

    pub fn add_segment<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        engine.add_segment(FRAC_PI_2);
        selection.bump_render();
    }

    /// Remove the last segment; a selection that pointed at it is cleared
    /// right away.
    pub fn remove_segment<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        engine.remove_last_segment();
        selection.resolve(engine.segment_count());
        selection.bump_render();
    }

    /// Default chain and 1x speed, keeping the pause, mass-calculation and
    /// energy-limiting flags and the integrator.
    pub fn reset<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        selection: &mut SelectionState,
    ) {
        let paused = engine.is_paused();
        let mass_calculation = engine.mass_calculation();
        let energy_limiting = engine.energy_limiting();
        let integrator = engine.integrator();
        engine.reset();
        engine.set_paused(paused);
        engine.set_mass_calculation(mass_calculation);
        engine.set_energy_limiting(energy_limiting);
        engine.set_integrator(integrator);
        selection.resolve(engine.segment_count());
        self.set_rung(NORMAL_SPEED_RUNG, engine, selection);
    }
}
