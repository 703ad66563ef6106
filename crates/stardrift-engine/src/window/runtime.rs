use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::core::{App, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::input::platform::winit::translate_window_event;
use crate::input::InputEvent;
use crate::render::RenderCtx;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "stardrift".to_string(),
            initial_size: LogicalSize::new(512.0, 512.0),
        }
    }
}

/// Lifecycle of the frame loop.
///
/// `Starting` until window, GPU and app resources are ready; `Running` while
/// frames are produced; `Terminated` once a close was requested or setup failed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum LoopPhase {
    Starting,
    Running,
    Terminated,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Opens the window, drives `app` until termination and returns.
    ///
    /// Window, surface, device or `App::on_gpu_ready` failures are returned as
    /// errors without any frame having run.
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: App + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;

        // Animate as fast as possible; input is polled once per iteration.
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut state = RuntimeState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        state.finish()
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct RuntimeState<A>
where
    A: App + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    phase: LoopPhase,
    fatal: Option<anyhow::Error>,
}

impl<A> RuntimeState<A>
where
    A: App + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        Self {
            config,
            gpu_init,
            app,
            window: None,
            phase: LoopPhase::Starting,
            fatal: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed")?;

        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let app = &mut self.app;
        entry
            .with_gpu(|gpu| {
                let size = gpu.size();
                let rctx = RenderCtx::new(
                    gpu.device(),
                    gpu.queue(),
                    gpu.surface_format(),
                    Viewport::new(size.width as f32, size.height as f32),
                );
                app.on_gpu_ready(&rctx)
            })
            .context("application setup failed")?;

        let size = entry.with_gpu(|gpu| gpu.size());
        self.app.on_resize(size.width, size.height);

        entry.with_window(|w| w.request_redraw());
        self.window = Some(entry);
        self.phase = LoopPhase::Running;
        log::info!("running");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.phase = LoopPhase::Terminated;
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn terminate(&mut self, event_loop: &ActiveEventLoop) {
        self.shut_down();
        event_loop.exit();
    }

    /// Moves `Running` to `Terminated`, notifying the app exactly once.
    fn shut_down(&mut self) {
        if self.phase == LoopPhase::Running {
            self.phase = LoopPhase::Terminated;
            log::info!("terminating");
            self.app.on_exit();
        }
    }

    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        log::debug!("resized to {}x{}", new_size.width, new_size.height);
        self.app.on_resize(new_size.width, new_size.height);
    }

    /// Drives one frame. Returns the app's directive.
    fn frame(&mut self, window_id: WindowId) -> AppControl {
        let (app, window) = (&mut self.app, &mut self.window);
        let Some(entry) = window.as_mut() else {
            return AppControl::Continue;
        };

        entry.with_mut(|fields| {
            let mut ctx = FrameCtx {
                window: WindowCtx {
                    id: window_id,
                    window: fields.window,
                },
                gpu: fields.gpu,
            };
            app.on_frame(&mut ctx)
        })
    }

    fn finish(mut self) -> Result<()> {
        self.shut_down();
        match self.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Routes one input event to the app. Key repeats are dropped.
fn dispatch_input<A: App>(app: &mut A, ev: InputEvent) -> AppControl {
    match ev {
        InputEvent::Key { repeat: true, .. } => AppControl::Continue,
        InputEvent::Key { key, state, .. } => app.on_key(key, state),
        InputEvent::Focused(focused) => {
            app.on_focus(focused);
            AppControl::Continue
        }
    }
}

impl<A> ApplicationHandler for RuntimeState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.phase != LoopPhase::Starting {
            return;
        }

        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.phase != LoopPhase::Running {
            return;
        }

        if let Some(ev) = translate_window_event(&event) {
            if dispatch_input(&mut self.app, ev) == AppControl::Exit {
                self.terminate(event_loop);
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => self.terminate(event_loop),

            WindowEvent::Resized(new_size) => self.resize(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self
                    .window
                    .as_ref()
                    .map(|entry| entry.with_window(|w| w.inner_size()))
                {
                    self.resize(size);
                }
            }

            WindowEvent::RedrawRequested => {
                if self.frame(window_id) == AppControl::Exit {
                    self.terminate(event_loop);
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if self.phase != LoopPhase::Running {
            return;
        }

        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shut_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Key, KeyState};

    #[derive(Default)]
    struct Recorder {
        keys: Vec<(Key, KeyState)>,
        focus: Vec<bool>,
    }

    impl App for Recorder {
        fn on_gpu_ready(&mut self, _ctx: &RenderCtx<'_>) -> Result<()> {
            Ok(())
        }

        fn on_key(&mut self, key: Key, state: KeyState) -> AppControl {
            self.keys.push((key, state));
            if key == Key::Escape {
                AppControl::Exit
            } else {
                AppControl::Continue
            }
        }

        fn on_focus(&mut self, focused: bool) {
            self.focus.push(focused);
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }
    }

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    #[test]
    fn keys_and_focus_reach_the_app_in_order() {
        let mut app = Recorder::default();

        dispatch_input(&mut app, key(Key::W, KeyState::Pressed, false));
        dispatch_input(&mut app, InputEvent::Focused(false));
        dispatch_input(&mut app, InputEvent::Focused(true));
        dispatch_input(&mut app, key(Key::W, KeyState::Pressed, false));

        assert_eq!(app.keys, vec![(Key::W, KeyState::Pressed), (Key::W, KeyState::Pressed)]);
        assert_eq!(app.focus, vec![false, true]);
    }

    #[test]
    fn repeats_are_dropped() {
        let mut app = Recorder::default();
        dispatch_input(&mut app, key(Key::A, KeyState::Pressed, true));
        assert!(app.keys.is_empty());
    }

    #[test]
    fn app_exit_is_propagated() {
        let mut app = Recorder::default();
        assert_eq!(
            dispatch_input(&mut app, key(Key::Escape, KeyState::Pressed, false)),
            AppControl::Exit
        );
    }
}
