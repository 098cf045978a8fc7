use super::{
    ActiveEventLoop, App, ApplicationHandler, Arc, DecagridError, ElementState, FutureExt,
    GridVisual, KeyCode, LogicalSize, MouseButton, MouseScrollDelta, PhysicalKey, RenderEngine,
    Vec2, Window, WindowEvent, WindowId,
};

// Pixel scroll deltas (touchpads) per wheel line.
const PIXELS_PER_LINE: f32 = 50.0;

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.options.window_size;
        let window_attributes = Window::default_attributes()
            .with_title(self.options.window_title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let engine = match RenderEngine::new_windowed(window.clone()).block_on() {
            Ok(engine) => engine,
            Err(e) => {
                self.fail(event_loop, e.into());
                return;
            }
        };

        let grid = GridVisual::new(
            &engine.device,
            engine.target_format(),
            self.options.grid_scale,
        );
        self.camera.set_viewport(engine.width, engine.height);
        log::info!("viewer started ({}x{})", engine.width, engine.height);

        self.window = Some(window);
        self.engine = Some(engine);
        self.grid = Some(grid);
        self.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.camera.set_viewport(size.width, size.height);
                }
                self.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
                self.ctrl_down = modifiers.state().control_key();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.left_mouse_down = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = Vec2::new(position.x as f32, position.y as f32);
                let delta = position - self.mouse_pos;
                self.mouse_pos = position;

                if self.left_mouse_down {
                    self.camera.pan(delta);
                    self.request_redraw();
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                let step = self.options.zoom_step.powf(lines);
                let factor = match (self.shift_down, self.ctrl_down) {
                    (true, false) => Vec2::new(step, 1.0),
                    (false, true) => Vec2::new(1.0, step),
                    _ => Vec2::splat(step),
                };
                self.camera.zoom_at(factor, self.mouse_pos);
                self.request_redraw();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed && !event.repeat {
                    if let PhysicalKey::Code(code) = event.physical_key {
                        match code {
                            KeyCode::Escape => {
                                self.close_requested = true;
                            }
                            KeyCode::KeyR => {
                                self.camera.reset();
                                self.request_redraw();
                            }
                            KeyCode::KeyP => {
                                self.toggle_projection();
                                self.request_redraw();
                            }
                            KeyCode::F12 => {
                                self.request_auto_screenshot();
                                log::info!("Screenshot requested (F12)");
                                self.request_redraw();
                            }
                            _ => {}
                        }
                    }
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: DecagridError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }
}
