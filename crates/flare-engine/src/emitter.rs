//! The [`Emitter`]: one reservation driven by a trigger, initializers and
//! modifiers.
//!
//! # Per-particle lifecycle
//!
//! ```text
//! Dead ──claim (emit stage)──▶ Alive ──TimeAlive > MaxLifetime──▶ Dead
//! ```
//!
//! Slots the emitter acquires (at construction or by expanding its
//! reservation) start dead. Dead slots keep whatever values they last
//! held; initializers overwrite them on the next claim.

use std::any::Any;
use std::fmt;

use flare_arena::{Allocator, Reservation, SharedAllocator};
use flare_behavior::{AccessPlan, Collection, EmitterState, Initializer, Modifier, Trigger};
use flare_core::standard::{IS_ALIVE, POSITION_X, POSITION_Y, TIME_ALIVE};
use flare_core::{PropertySet, ReservationId, Vec2};
use tracing::{debug, trace};

use crate::config::EmitterConfig;
use crate::error::EmitterError;

/// A particle emitter owning one reservation in a shared allocator.
///
/// The reservation is released when the emitter is dropped or
/// [`dispose`](Emitter::dispose)d.
pub struct Emitter {
    reservation: Reservation,
    state: EmitterState,
    trigger: Box<dyn Trigger>,
    initializers: Vec<Box<dyn Initializer>>,
    modifiers: Vec<Box<dyn Modifier>>,
    plan: AccessPlan,
    reservation_growth: f32,
    /// Indices claimed by the current emission, reused across ticks.
    claimed: Vec<usize>,
    no_access: PropertySet,
}

impl Emitter {
    /// Build an emitter drawing its particles from `allocator`.
    ///
    /// Registers every property the behaviors declare, reserves
    /// `initial_capacity` slots and marks them dead.
    ///
    /// # Errors
    ///
    /// [`EmitterError::Configuration`] if `config` fails validation,
    /// including when no trigger is set.
    pub fn new(allocator: &SharedAllocator, config: EmitterConfig) -> Result<Self, EmitterError> {
        config.validate()?;
        let EmitterConfig {
            trigger,
            initializers,
            modifiers,
            max_particle_lifetime,
            initial_capacity,
            reservation_growth,
        } = config;
        let trigger = trigger.ok_or_else(|| EmitterError::Configuration {
            reason: "trigger is required".to_string(),
        })?;

        let plan = AccessPlan::build(&initializers, &modifiers);
        {
            let mut alloc = allocator.try_borrow_mut()?;
            for key in plan.properties() {
                alloc.register_property(*key);
            }
        }

        let reservation = allocator.reserve(initial_capacity)?;
        {
            let alloc = allocator.try_borrow()?;
            mark_dead(&alloc, reservation.id(), 0)?;
        }

        debug!(
            reservation = %reservation.id(),
            capacity = initial_capacity,
            properties = plan.properties().len(),
            "emitter created"
        );

        Ok(Self {
            reservation,
            state: EmitterState::new(max_particle_lifetime),
            trigger,
            initializers,
            modifiers,
            plan,
            reservation_growth,
            claimed: Vec::with_capacity(initial_capacity),
            no_access: PropertySet::empty(),
        })
    }

    // ── Tick ───────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds.
    ///
    /// An error aborts the tick where it happened; particle state is then
    /// whatever the completed stages left behind.
    pub fn update(&mut self, dt: f32) -> Result<(), EmitterError> {
        let shared = self.reservation.allocator().clone();
        {
            let alloc = shared.try_borrow()?;
            self.age(&alloc, dt)?;
            self.run_modifiers(&alloc, dt)?;
        }
        if self.state.is_emitting() {
            self.emit(&shared, dt)?;
        }
        Ok(())
    }

    fn age(&self, alloc: &Allocator, dt: f32) -> Result<(), EmitterError> {
        let id = self.reservation.id();
        let max_lifetime = self.state.max_particle_lifetime();
        let mut alive = alloc.values(id, &IS_ALIVE)?;
        let mut time_alive = alloc.values(id, &TIME_ALIVE)?;
        for (is_alive, time) in alive.iter_mut().zip(time_alive.iter_mut()) {
            *time += dt;
            *is_alive = *is_alive && *time <= max_lifetime;
        }
        Ok(())
    }

    fn run_modifiers(&mut self, alloc: &Allocator, dt: f32) -> Result<(), EmitterError> {
        let id = self.reservation.id();
        for (modifier, access) in self.modifiers.iter_mut().zip(self.plan.modifiers()) {
            let particles = Collection::new(alloc, id, access.reads(), access.writes())
                .map_err(|e| EmitterError::behavior(access.name(), e))?;
            modifier
                .update(&self.state, &particles, dt)
                .map_err(|e| EmitterError::behavior(access.name(), e))?;
        }
        Ok(())
    }

    fn emit(&mut self, shared: &SharedAllocator, dt: f32) -> Result<(), EmitterError> {
        let count = self.trigger.determine_count(&mut self.state, dt) as usize;
        if count == 0 {
            return Ok(());
        }
        self.claim(shared, count)?;

        let alloc = shared.try_borrow()?;
        let id = self.reservation.id();
        for (initializer, access) in self.initializers.iter_mut().zip(self.plan.initializers()) {
            let particles = Collection::new(&alloc, id, access.reads(), access.writes())
                .map_err(|e| EmitterError::behavior(access.name(), e))?;
            initializer
                .initialize(&self.state, &particles, &self.claimed)
                .map_err(|e| EmitterError::behavior(access.name(), e))?;
        }

        let origin = self.state.world_position();
        let mut xs = alloc.values(id, &POSITION_X)?;
        let mut ys = alloc.values(id, &POSITION_Y)?;
        for &i in &self.claimed {
            xs[i] += origin.x;
            ys[i] += origin.y;
        }

        trace!(reservation = %id, claimed = count, "particles emitted");
        Ok(())
    }

    /// Claim `count` dead slots into `self.claimed`, expanding the
    /// reservation as often as needed. The scan never revisits a slot.
    fn claim(&mut self, shared: &SharedAllocator, count: usize) -> Result<(), EmitterError> {
        self.claimed.clear();
        let id = self.reservation.id();
        let mut cursor = 0;
        loop {
            {
                let alloc = shared.try_borrow()?;
                let mut alive = alloc.values(id, &IS_ALIVE)?;
                let mut time_alive = alloc.values(id, &TIME_ALIVE)?;
                while cursor < alive.len() && self.claimed.len() < count {
                    if !alive[cursor] {
                        alive[cursor] = true;
                        time_alive[cursor] = 0.0;
                        self.claimed.push(cursor);
                    }
                    cursor += 1;
                }
            }
            if self.claimed.len() == count {
                return Ok(());
            }

            let len = self.reservation.len()?;
            let shortfall = count - self.claimed.len();
            let growth = (len as f32 * self.reservation_growth).ceil() as usize;
            let extra = growth.max(shortfall);
            self.reservation.expand(extra)?;
            let alloc = shared.try_borrow()?;
            mark_dead(&alloc, id, len)?;
            trace!(reservation = %id, from = len, to = len + extra, "reservation expanded");
        }
    }

    // ── Behaviors ──────────────────────────────────────────────────

    /// The first initializer, modifier or trigger of concrete type `T`,
    /// searched in that order.
    pub fn behavior<T: Any>(&self) -> Option<&T> {
        self.initializers
            .iter()
            .find_map(|b| (&**b as &dyn Any).downcast_ref::<T>())
            .or_else(|| {
                self.modifiers
                    .iter()
                    .find_map(|b| (&**b as &dyn Any).downcast_ref::<T>())
            })
            .or_else(|| (&*self.trigger as &dyn Any).downcast_ref::<T>())
    }

    /// Mutable form of [`behavior`](Self::behavior).
    pub fn behavior_mut<T: Any>(&mut self) -> Option<&mut T> {
        if let Some(i) = self
            .initializers
            .iter()
            .position(|b| (&**b as &dyn Any).is::<T>())
        {
            return (&mut *self.initializers[i] as &mut dyn Any).downcast_mut::<T>();
        }
        if let Some(i) = self
            .modifiers
            .iter()
            .position(|b| (&**b as &dyn Any).is::<T>())
        {
            return (&mut *self.modifiers[i] as &mut dyn Any).downcast_mut::<T>();
        }
        (&mut *self.trigger as &mut dyn Any).downcast_mut::<T>()
    }

    /// Precomputed access sets of this emitter's behaviors.
    pub fn access_plan(&self) -> &AccessPlan {
        &self.plan
    }

    // ── Observation ────────────────────────────────────────────────

    /// A read-only collection over this emitter's particles.
    ///
    /// Observers iterate [`count`](Collection::count) entries and skip
    /// those whose `IsAlive` is false.
    ///
    /// # Errors
    ///
    /// [`EmitterError::ForeignAllocator`] unless `allocator` is a borrow of
    /// [`allocator()`](Self::allocator).
    pub fn view<'a>(
        &'a self,
        allocator: &'a Allocator,
        readable: &'a PropertySet,
    ) -> Result<Collection<'a>, EmitterError> {
        let own = self.reservation.allocator().try_borrow()?;
        if !std::ptr::eq(allocator, &*own) {
            return Err(EmitterError::ForeignAllocator {
                reservation: self.reservation.id(),
            });
        }
        Collection::new(allocator, self.reservation.id(), readable, &self.no_access)
            .map_err(|e| EmitterError::behavior("view", e))
    }

    /// Slots in the reservation, alive or dead.
    pub fn len(&self) -> Result<usize, EmitterError> {
        Ok(self.reservation.len()?)
    }

    /// Whether the reservation is empty. Never true for a live emitter.
    pub fn is_empty(&self) -> Result<bool, EmitterError> {
        Ok(self.len()? == 0)
    }

    /// Particles currently alive.
    pub fn alive_count(&self) -> Result<usize, EmitterError> {
        let count = self
            .reservation
            .with_read_only_values(&IS_ALIVE, |alive| alive.iter().filter(|&&a| a).count())?;
        Ok(count)
    }

    // ── Emitter state ──────────────────────────────────────────────

    /// World-space origin added to newly emitted particles.
    pub fn world_position(&self) -> Vec2 {
        self.state.world_position()
    }

    /// Move the emitter. Affects particles emitted from now on.
    pub fn set_world_position(&mut self, position: Vec2) {
        self.state.set_world_position(position);
    }

    /// Whether the emit stage runs.
    pub fn is_emitting(&self) -> bool {
        self.state.is_emitting()
    }

    /// Enable or disable the emit stage. Aging and modifiers keep running.
    pub fn set_emitting(&mut self, emitting: bool) {
        self.state.set_emitting(emitting);
    }

    /// Seconds a particle lives.
    pub fn max_particle_lifetime(&self) -> f32 {
        self.state.max_particle_lifetime()
    }

    /// State as seen by behaviors.
    pub fn state(&self) -> &EmitterState {
        &self.state
    }

    // ── Ownership ──────────────────────────────────────────────────

    /// Id of the owned reservation.
    pub fn reservation_id(&self) -> ReservationId {
        self.reservation.id()
    }

    /// The allocator this emitter draws from.
    pub fn allocator(&self) -> &SharedAllocator {
        self.reservation.allocator()
    }

    /// Release the reservation now.
    pub fn dispose(self) {
        drop(self);
    }
}

/// Mark every slot from `from` to the end of the reservation dead.
fn mark_dead(alloc: &Allocator, id: ReservationId, from: usize) -> Result<(), EmitterError> {
    alloc.values(id, &IS_ALIVE)?[from..].fill(false);
    alloc.values(id, &TIME_ALIVE)?[from..].fill(0.0);
    Ok(())
}

impl fmt::Debug for Emitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("reservation", &self.reservation)
            .field("state", &self.state)
            .field("trigger", &self.trigger.name())
            .field("initializers", &self.initializers.len())
            .field("modifiers", &self.modifiers.len())
            .finish()
    }
}
