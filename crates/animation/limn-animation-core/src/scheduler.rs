//! The frame scheduler.
//!
//! One `Scheduler` owns one compiled scene: the document, the event and loop
//! registry, the live task list, and the continuation bookkeeping. Hosts
//! drive it cooperatively: translate real events into [`fire`] calls, start
//! declared loops once, then call [`tick`] every frame with elapsed
//! milliseconds and apply the report however they render.
//!
//! Nothing in here is shared or global; independent scenes run side by side
//! on separate schedulers.
//!
//! [`fire`]: Scheduler::fire
//! [`tick`]: Scheduler::tick

use std::collections::HashMap;
use std::mem;

use limn_scene_core::{CompiledScene, Document, IdGen, Registry};

use crate::easing::Easing;
use crate::error::AnimError;
use crate::outputs::{SchedEvent, TickReport};
use crate::task::{AnimSpec, AnimateOptions, Callback, CompletionAction, DependFn, Task, TaskState};

pub struct Scheduler {
    document: Document,
    registry: Registry,
    ids: IdGen,
    now: f64,
    viewport: (f64, f64),
    tasks: Vec<Task>,
    /// Live control flags keyed by animation id; cleared entries abort.
    control: HashMap<String, bool>,
    depends: HashMap<String, DependFn>,
    /// Viewport each depend function last derived against.
    depend_viewport: HashMap<String, (f64, f64)>,
    callbacks: HashMap<String, Callback>,
    /// Accumulates until the next tick boundary.
    pending: TickReport,
    /// What the last tick produced.
    report: TickReport,
}

impl Scheduler {
    /// Take ownership of a compiled scene. The viewport starts at zero;
    /// call [`set_viewport`](Self::set_viewport) before registering depend
    /// functions that care about it.
    pub fn new(scene: CompiledScene) -> Self {
        Self {
            document: scene.document,
            registry: scene.registry,
            ids: IdGen::new(),
            now: 0.0,
            viewport: (0.0, 0.0),
            tasks: Vec::new(),
            control: HashMap::new(),
            depends: HashMap::new(),
            depend_viewport: HashMap::new(),
            callbacks: HashMap::new(),
            pending: TickReport::default(),
            report: TickReport::default(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Hosts may mutate the tree directly; tasks observe removals on their
    /// next step.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn viewport(&self) -> (f64, f64) {
        self.viewport
    }

    /// Tasks still waiting or stepping.
    pub fn active_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// The report produced by the most recent [`tick`](Self::tick).
    pub fn last_report(&self) -> &TickReport {
        &self.report
    }

    /// Update the dimensions depend functions observe. Each depending task
    /// re-derives its targets on its next step.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
    }

    /// Advance the clock by `dt` milliseconds and step every live task in
    /// spawn order. When two tasks animate the same attribute the later
    /// spawn wins the frame. Writes and events raised outside a tick (from
    /// `fire`, `animate`, callbacks) surface in the next tick's report.
    pub fn tick(&mut self, dt: f64) -> &TickReport {
        self.now += dt;
        let now = self.now;

        let mut stepped = mem::take(&mut self.tasks);
        for task in &mut stepped {
            self.rederive(task);
            let control_ok = match &task.control_id {
                Some(id) => self.control.get(id).copied().unwrap_or(false),
                None => true,
            };
            task.advance(now, control_ok, &mut self.document, &mut self.pending);
        }

        // Survivors go back first; continuations below may spawn new tasks
        // behind them.
        let mut ended = Vec::new();
        for task in stepped {
            match task.state {
                TaskState::Completed | TaskState::Aborted => ended.push(task),
                _ => self.tasks.push(task),
            }
        }
        for task in ended {
            self.finish(task);
        }

        mem::swap(&mut self.report, &mut self.pending);
        self.pending.clear();
        &self.report
    }

    /// Fire an event by name. Each registered entry whose owner is still in
    /// the document spawns a task from the property set under its cursor,
    /// then advances the cursor round-robin. Missing owners skip without
    /// advancing; spawn failures are reported, the cursor stays advanced.
    pub fn fire(&mut self, event: &str) {
        self.fire_filtered(event, None);
    }

    /// Fire an event against a single owner, the way a scoped listener
    /// would deliver it.
    pub fn fire_scoped(&mut self, event: &str, owner_id: &str) {
        self.fire_filtered(event, Some(owner_id));
    }

    fn fire_filtered(&mut self, event: &str, owner: Option<&str>) {
        let mut spawns = Vec::new();
        if let Some(entries) = self.registry.events.get_mut(event) {
            for entry in entries.iter_mut() {
                if let Some(owner_id) = owner {
                    if entry.owner_id != owner_id {
                        continue;
                    }
                }
                if !self.document.contains(&entry.owner_id) {
                    continue;
                }
                let props = match entry.current_props() {
                    Some(props) => props.clone(),
                    None => continue,
                };
                entry.advance_cursor();
                spawns.push((
                    entry.owner_id.clone(),
                    entry.duration,
                    entry.ease.clone(),
                    entry.delay,
                    props,
                ));
            }
        }
        for (owner_id, duration, ease, delay, props) in spawns {
            let easing = self.resolve_easing(&ease);
            let spec = AnimSpec {
                duration,
                easing,
                delay,
                props,
            };
            let anim = self.ids.handle();
            self.spawn_task(anim, owner_id, spec, None, None);
        }
    }

    /// Start every loop marked to auto-start whose chain is not already
    /// live. Call once after compiling; stopped loops are not re-armed.
    pub fn start_loops(&mut self) {
        let names: Vec<String> = self
            .registry
            .loops
            .iter()
            .filter(|(_, state)| state.start && state.status && !state.started)
            .map(|(name, _)| name.clone())
            .collect();
        for name in names {
            self.start_loop(&name);
        }
    }

    /// Begin one loop's continuation chain. Only loops declared with
    /// `start: true` run; a live chain is left alone. Re-arms a loop that
    /// was stopped, resuming at the step after the one that last ran.
    pub fn start_loop(&mut self, name: &str) {
        let arm = match self.registry.loops.get_mut(name) {
            Some(state) => {
                if state.start && !state.started {
                    state.status = true;
                    state.started = true;
                    true
                } else {
                    false
                }
            }
            None => false,
        };
        if arm {
            self.drive_loop(name);
        }
    }

    /// Flip a loop's run flag. A live chain observes a cleared flag at its
    /// next step boundary and stops there; restoring the flag does not
    /// restart the chain, use [`start_loop`](Self::start_loop). Returns
    /// false for unknown loop names.
    pub fn set_loop_status(&mut self, name: &str, status: bool) -> bool {
        match self.registry.loops.get_mut(name) {
            Some(state) => {
                state.status = status;
                true
            }
            None => false,
        }
    }

    /// Animate `target` directly. The returned animation id keys
    /// [`cancel`](Self::cancel); pass a name in `opts` to choose it.
    /// Snapshot or target decode failures surface here instead of in the
    /// report, and no task spawns.
    pub fn animate(
        &mut self,
        target: &str,
        spec: AnimSpec,
        opts: AnimateOptions,
    ) -> Result<String, AnimError> {
        let anim = match opts.name {
            Some(name) => name,
            None => self.ids.handle(),
        };
        let mut task = Task::spawn(anim.clone(), target.to_string(), spec, self.now, &self.document)?;
        task.control_id = Some(anim.clone());
        if opts.on_complete.is_some() {
            task.continuation = Some(CompletionAction::Callback);
        }

        self.control.insert(anim.clone(), true);
        if let Some(depend) = opts.depend {
            self.depends.insert(anim.clone(), depend);
            self.depend_viewport.insert(anim.clone(), self.viewport);
        }
        if let Some(callback) = opts.on_complete {
            self.callbacks.insert(anim.clone(), callback);
        }
        self.pending.push_event(SchedEvent::TaskStarted {
            anim: anim.clone(),
            target: target.to_string(),
        });
        self.tasks.push(task);
        Ok(anim)
    }

    /// Clear an animation's control flag. The task observes it on its next
    /// step: the frame's writes still land, then the task ends as aborted
    /// and its completion callback (if any) runs. Returns false for ids
    /// that are not live.
    pub fn cancel(&mut self, anim_id: &str) -> bool {
        match self.control.get_mut(anim_id) {
            Some(flag) => {
                *flag = false;
                true
            }
            None => false,
        }
    }

    /// Re-derive a depending task's targets when the viewport moved since
    /// its last derivation. Failures abort the task and land in the report.
    fn rederive(&mut self, task: &mut Task) {
        let control_id = match &task.control_id {
            Some(id) => id.clone(),
            None => return,
        };
        if !self.depends.contains_key(&control_id) {
            return;
        }
        if self.depend_viewport.get(&control_id) == Some(&self.viewport) {
            return;
        }
        self.depend_viewport.insert(control_id.clone(), self.viewport);
        let (width, height) = self.viewport;
        let next = match self.depends.get_mut(&control_id) {
            Some(func) => func(&task.props, width, height),
            None => return,
        };
        if let Err(err) = task.retarget(next) {
            self.pending.push_event(SchedEvent::Error {
                message: err.to_string(),
            });
            task.state = TaskState::Aborted;
        }
    }

    /// Report, release bookkeeping, run the continuation. Runs for aborted
    /// tasks too: a cancelled animation still fires its callback, and a
    /// stopped loop step still re-enters the driver to record the stop.
    fn finish(&mut self, task: Task) {
        let event = match task.state {
            TaskState::Completed => SchedEvent::TaskCompleted {
                anim: task.id.clone(),
                target: task.target.clone(),
            },
            _ => SchedEvent::TaskAborted {
                anim: task.id.clone(),
                target: task.target.clone(),
            },
        };
        self.pending.push_event(event);

        if let Some(control_id) = &task.control_id {
            self.control.remove(control_id);
            self.depends.remove(control_id);
            self.depend_viewport.remove(control_id);
        }
        match task.continuation {
            Some(CompletionAction::Loop(name)) => self.drive_loop(&name),
            Some(CompletionAction::Callback) => {
                if let Some(control_id) = &task.control_id {
                    if let Some(mut callback) = self.callbacks.remove(control_id) {
                        callback(self);
                    }
                }
            }
            None => {}
        }
    }

    /// Run one loop step: wrap the index, pick the step's synthetic event,
    /// advance the index, spawn against the first registered entry. Any
    /// dead end (flag cleared, vanished owner, spawn failure) clears
    /// `started` so the loop can be re-armed later.
    fn drive_loop(&mut self, name: &str) {
        let event_id = {
            let state = match self.registry.loops.get_mut(name) {
                Some(state) => state,
                None => return,
            };
            if !state.status || state.events.is_empty() {
                None
            } else {
                if state.index >= state.events.len() {
                    state.index = 0;
                }
                let id = state.events.get(state.index).cloned();
                state.index += 1;
                id
            }
        };
        let event_id = match event_id {
            Some(id) => id,
            None => {
                self.stop_loop_chain(name);
                return;
            }
        };

        let entry = match self.registry.entries(&event_id).first() {
            Some(entry) => entry.clone(),
            None => {
                self.stop_loop_chain(name);
                return;
            }
        };
        if !self.document.contains(&entry.owner_id) {
            self.stop_loop_chain(name);
            return;
        }

        let easing = self.resolve_easing(&entry.ease);
        let spec = AnimSpec {
            duration: entry.duration,
            easing,
            delay: entry.delay,
            props: entry.props.first().cloned().unwrap_or_default(),
        };
        let handle = self.ids.handle();
        self.control.insert(handle.clone(), true);
        let spawned = self.spawn_task(
            handle.clone(),
            entry.owner_id,
            spec,
            Some(handle.clone()),
            Some(CompletionAction::Loop(name.to_string())),
        );
        if !spawned {
            self.control.remove(&handle);
            self.stop_loop_chain(name);
        }
    }

    fn stop_loop_chain(&mut self, name: &str) {
        if let Some(state) = self.registry.loops.get_mut(name) {
            state.started = false;
        }
        self.pending.push_event(SchedEvent::LoopStopped {
            name: name.to_string(),
        });
    }

    /// Spawn for the event-driven paths, where failures are reported rather
    /// than returned. True when a task actually started.
    fn spawn_task(
        &mut self,
        anim: String,
        target: String,
        spec: AnimSpec,
        control_id: Option<String>,
        continuation: Option<CompletionAction>,
    ) -> bool {
        match Task::spawn(anim.clone(), target.clone(), spec, self.now, &self.document) {
            Ok(mut task) => {
                task.control_id = control_id;
                task.continuation = continuation;
                self.tasks.push(task);
                self.pending
                    .push_event(SchedEvent::TaskStarted { anim, target });
                true
            }
            Err(err) => {
                self.pending.push_event(SchedEvent::Error {
                    message: err.to_string(),
                });
                false
            }
        }
    }

    /// Easing names from registrations resolve leniently: unknown names
    /// report an error and fall back to linear.
    fn resolve_easing(&mut self, name: &str) -> Easing {
        match Easing::from_name(name) {
            Some(easing) => easing,
            None => {
                self.pending.push_event(SchedEvent::Error {
                    message: AnimError::UnknownEasing(name.to_string()).to_string(),
                });
                Easing::Linear
            }
        }
    }
}
