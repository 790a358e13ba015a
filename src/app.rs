use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    error::EventLoopError,
    event::{ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::demos::DemoKey;
use crate::rendering::Renderer;

const WINDOW_TITLE: &str = "WebGPU Compute Sims";

/// What a pressed key does
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    SelectDemo(usize),
    NextDemo,
    PreviousDemo,
    TogglePause,
    Demo(DemoKey),
    Exit,
}

impl Action {
    pub fn from_key(key_code: KeyCode) -> Option<Self> {
        let action = match key_code {
            // Number keys for direct demo selection
            KeyCode::Digit1 => Action::SelectDemo(0),
            KeyCode::Digit2 => Action::SelectDemo(1),
            KeyCode::Digit3 => Action::SelectDemo(2),

            KeyCode::ArrowRight => Action::NextDemo,
            KeyCode::ArrowLeft => Action::PreviousDemo,
            KeyCode::Space => Action::TogglePause,

            KeyCode::ArrowUp => Action::Demo(DemoKey::EyeForward),
            KeyCode::ArrowDown => Action::Demo(DemoKey::EyeBackward),
            KeyCode::Tab => Action::Demo(DemoKey::NextFilter),

            KeyCode::Escape => Action::Exit,
            _ => return None,
        };
        Some(action)
    }
}

#[derive(Default)]
pub struct App {
    state: Option<Renderer>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        // Create window object
        let attributes = Window::default_attributes().with_title(WINDOW_TITLE);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create the window: {err}");
                event_loop.exit();
                return;
            }
        };

        match pollster::block_on(Renderer::new(window.clone())) {
            Ok(state) => {
                self.state = Some(state);
                window.request_redraw();
            }
            Err(err) => {
                log::error!("Setup failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                log::info!("The close button was pressed; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                match state.render() {
                    Ok(()) => {}
                    Err(err) if err.is_recoverable() => log::warn!("Skipping frame: {err}"),
                    Err(err) => {
                        log::error!("{err}");
                        event_loop.exit();
                        return;
                    }
                }
                // Emits a new redraw requested event.
                state.window().request_redraw();
            }
            WindowEvent::Resized(size) => {
                // Reconfigures the size of the surface. We do not re-render
                // here as this event is always followed up by redraw request.
                if let Err(err) = state.resize(size) {
                    log::error!("Resize failed: {err}");
                    event_loop.exit();
                }
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => state.handle_mouse_button(button_state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                state.handle_mouse_move([position.x as f32, position.y as f32]);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match Action::from_key(key_code) {
                Some(Action::SelectDemo(index)) => state.switch_demo(index),
                Some(Action::NextDemo) => state.next_demo(),
                Some(Action::PreviousDemo) => state.previous_demo(),
                Some(Action::TogglePause) => state.toggle_pause(),
                Some(Action::Demo(key)) => state.demo_key(key),
                Some(Action::Exit) => event_loop.exit(),
                None => (),
            },
            _ => (),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Drains the queue before the window goes away
        self.state = None;
    }
}

pub fn run() -> Result<(), EventLoopError> {
    // Initialize logger
    env_logger::init();

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create app
    let mut app = App::default();
    event_loop.run_app(&mut app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_select_demos() {
        assert_eq!(Action::from_key(KeyCode::Digit1), Some(Action::SelectDemo(0)));
        assert_eq!(Action::from_key(KeyCode::Digit3), Some(Action::SelectDemo(2)));
    }

    #[test]
    fn arrows_move_the_eye_and_switch_demos() {
        assert_eq!(Action::from_key(KeyCode::ArrowUp), Some(Action::Demo(DemoKey::EyeForward)));
        assert_eq!(Action::from_key(KeyCode::ArrowDown), Some(Action::Demo(DemoKey::EyeBackward)));
        assert_eq!(Action::from_key(KeyCode::ArrowRight), Some(Action::NextDemo));
        assert_eq!(Action::from_key(KeyCode::ArrowLeft), Some(Action::PreviousDemo));
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        assert_eq!(Action::from_key(KeyCode::KeyQ), None);
    }
}
