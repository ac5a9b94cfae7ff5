//! Background render lifecycle.
//!
//! A `Raytracer` owns the output image and at most one worker thread.
//! Starting a render stops the previous one first; stopping blocks until the
//! worker has exited. The worker publishes rows into the shared image as
//! they finish, so the host can display a render in progress.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use lumen_core::{RenderParameters, Scene, SceneError};
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use thiserror::Error;

use crate::renderer::{clear_color, render_rows, FrameOutcome, ImageBuffer};
use crate::scene::RaytraceScene;

/// Errors that can occur when starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),

    #[error("failed to spawn render thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Where the background render is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No render has been started.
    Idle,
    /// A worker is sweeping pixels.
    Running,
    /// A worker is running but has been asked to stop.
    CancelRequested,
    /// The last worker has exited.
    Stopped,
}

impl RenderState {
    fn is_active(self) -> bool {
        matches!(self, RenderState::Running | RenderState::CancelRequested)
    }
}

#[derive(Debug)]
struct Status {
    state: RenderState,
    outcome: Option<FrameOutcome>,
}

/// State shared between the host and the worker.
#[derive(Debug)]
struct Lifecycle {
    status: Mutex<Status>,
    changed: Condvar,
    cancel: AtomicBool,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            status: Mutex::new(Status {
                state: RenderState::Idle,
                outcome: None,
            }),
            changed: Condvar::new(),
            cancel: AtomicBool::new(false),
        }
    }

    fn status(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block until no worker is active.
    fn wait_inactive(&self) -> Option<FrameOutcome> {
        let mut status = self.status();
        while status.state.is_active() {
            status = self
                .changed
                .wait(status)
                .unwrap_or_else(PoisonError::into_inner);
        }
        status.outcome
    }
}

/// Marks the worker finished when dropped, even if the sweep panics.
struct FinishGuard {
    lifecycle: Arc<Lifecycle>,
    outcome: FrameOutcome,
}

impl Drop for FinishGuard {
    fn drop(&mut self) {
        let mut status = self.lifecycle.status();
        status.state = RenderState::Stopped;
        status.outcome = Some(self.outcome);
        self.lifecycle.changed.notify_all();
    }
}

fn lock_image(image: &Mutex<ImageBuffer>) -> MutexGuard<'_, ImageBuffer> {
    image.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Restartable background ray tracer.
pub struct Raytracer {
    image: Arc<Mutex<ImageBuffer>>,
    lifecycle: Arc<Lifecycle>,
    worker: Option<JoinHandle<()>>,
    /// Pixel pool, rebuilt when the thread hint changes
    pool: Option<(usize, Arc<ThreadPool>)>,
}

impl Raytracer {
    /// Create a ray tracer with an empty output image.
    pub fn new() -> Self {
        Self::with_size(0, 0)
    }

    /// Create a ray tracer with a `width` x `height` output image.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            image: Arc::new(Mutex::new(ImageBuffer::new(width, height))),
            lifecycle: Arc::new(Lifecycle::new()),
            worker: None,
            pool: None,
        }
    }

    /// Reallocate the output image. Any render in flight is stopped first.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.stop_render();
        lock_image(&self.image).resize(width, height);
        log::debug!("Resized render target to {}x{}", width, height);
    }

    /// Stop any render in flight, snapshot `scene` and start a new render in
    /// the background. Returns without waiting for the render.
    pub fn start_render(
        &mut self,
        scene: &Scene,
        params: &RenderParameters,
    ) -> Result<(), RenderError> {
        self.stop_render();

        let snapshot = Arc::new(RaytraceScene::build(scene, params)?);
        let pool = self.pool(params.threads)?;
        let params = params.clone();

        let (width, height) = {
            let mut image = lock_image(&self.image);
            image.clear(clear_color(&params));
            (image.width, image.height)
        };

        {
            let mut status = self.lifecycle.status();
            status.state = RenderState::Running;
            status.outcome = None;
        }
        self.lifecycle.cancel.store(false, Ordering::SeqCst);

        log::info!(
            "Rendering {}x{}: {} triangles, {} lights, {} threads",
            width,
            height,
            snapshot.triangle_count(),
            snapshot.lights().len(),
            pool.current_num_threads()
        );

        let image = Arc::clone(&self.image);
        let lifecycle = Arc::clone(&self.lifecycle);
        let spawned = thread::Builder::new()
            .name("lumen-render".to_string())
            .spawn(move || {
                let mut guard = FinishGuard {
                    lifecycle: Arc::clone(&lifecycle),
                    outcome: FrameOutcome::Cancelled,
                };
                let start = Instant::now();

                guard.outcome = pool.install(|| {
                    render_rows(
                        &snapshot,
                        &params,
                        width,
                        height,
                        &lifecycle.cancel,
                        |y, row| lock_image(&image).set_row(y, row),
                    )
                });

                log::info!("Render {:?} in {:?}", guard.outcome, start.elapsed());
            });

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                Ok(())
            }
            Err(err) => {
                self.lifecycle.status().state = RenderState::Idle;
                Err(err.into())
            }
        }
    }

    /// Ask the worker to stop and block until it has exited.
    ///
    /// Returns the outcome of the last render, if any.
    pub fn stop_render(&mut self) -> Option<FrameOutcome> {
        {
            let mut status = self.lifecycle.status();
            if status.state == RenderState::Running {
                status.state = RenderState::CancelRequested;
                self.lifecycle.cancel.store(true, Ordering::SeqCst);
                log::debug!("Render cancellation requested");
            }
        }
        self.finish()
    }

    /// Block until the current render completes on its own.
    pub fn wait(&mut self) -> Option<FrameOutcome> {
        self.finish()
    }

    fn finish(&mut self) -> Option<FrameOutcome> {
        let outcome = self.lifecycle.wait_inactive();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                log::error!("Render thread panicked");
            }
        }
        self.lifecycle.cancel.store(false, Ordering::SeqCst);
        outcome
    }

    pub fn state(&self) -> RenderState {
        self.lifecycle.status().state
    }

    pub fn is_running(&self) -> bool {
        self.state().is_active()
    }

    /// Copy of the output image as it currently stands.
    pub fn frame(&self) -> ImageBuffer {
        lock_image(&self.image).clone()
    }

    pub fn size(&self) -> (u32, u32) {
        let image = lock_image(&self.image);
        (image.width, image.height)
    }

    fn pool(&mut self, threads: usize) -> Result<Arc<ThreadPool>, RenderError> {
        if let Some((hint, pool)) = &self.pool {
            if *hint == threads {
                return Ok(Arc::clone(pool));
            }
        }

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("lumen-pixel-{i}"))
                .build()?,
        );
        self.pool = Some((threads, Arc::clone(&pool)));
        Ok(pool)
    }
}

impl Default for Raytracer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Raytracer {
    fn drop(&mut self) {
        self.stop_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Material, Mesh, Model};
    use lumen_math::Vec3;

    fn wall_scene() -> Scene {
        let mut scene = Scene::new("wall");
        let material = scene.add_material(Material {
            ambient: Vec3::new(0.0, 1.0, 0.0),
            ..Material::default()
        });
        let wall = Mesh::quad(
            Vec3::new(-10.0, -10.0, 4.0),
            Vec3::new(0.0, 20.0, 0.0),
            Vec3::new(20.0, 0.0, 0.0),
        );
        scene
            .add_model(Model::new("wall", wall).with_material(material))
            .unwrap();
        scene
    }

    #[test]
    fn test_idle_before_first_render() {
        let mut raytracer = Raytracer::with_size(4, 4);
        assert_eq!(raytracer.state(), RenderState::Idle);
        assert_eq!(raytracer.stop_render(), None);
        assert_eq!(raytracer.state(), RenderState::Idle);
    }

    #[test]
    fn test_render_completes() {
        let mut raytracer = Raytracer::with_size(16, 8);
        let params = RenderParameters {
            threads: 2,
            ..Default::default()
        };

        raytracer.start_render(&wall_scene(), &params).unwrap();
        assert_eq!(raytracer.wait(), Some(FrameOutcome::Completed));
        assert_eq!(raytracer.state(), RenderState::Stopped);

        let frame = raytracer.frame();
        assert_eq!(frame.pixels.len(), 16 * 8);
        assert!(frame.pixels.iter().all(|p| p[1] == 255));
    }

    #[test]
    fn test_restart_and_stop() {
        let mut raytracer = Raytracer::with_size(64, 64);
        let scene = wall_scene();
        let params = RenderParameters::default();

        for _ in 0..3 {
            raytracer.start_render(&scene, &params).unwrap();
        }
        raytracer.stop_render();

        assert_eq!(raytracer.state(), RenderState::Stopped);
        assert!(!raytracer.is_running());
        assert!(raytracer.worker.is_none());
    }

    #[test]
    fn test_resize_stops_and_reallocates() {
        let mut raytracer = Raytracer::with_size(8, 8);
        raytracer
            .start_render(&wall_scene(), &RenderParameters::default())
            .unwrap();

        raytracer.resize(3, 5);
        assert!(!raytracer.is_running());
        assert_eq!(raytracer.size(), (3, 5));
        assert_eq!(raytracer.frame().pixels.len(), 15);
    }

    #[test]
    fn test_pool_reused_for_same_hint() {
        let mut raytracer = Raytracer::new();
        let a = raytracer.pool(2).unwrap();
        let b = raytracer.pool(2).unwrap();
        let c = raytracer.pool(3).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.current_num_threads(), 3);
    }

    #[test]
    fn test_invalid_scene_is_rejected() {
        let mut scene = wall_scene();
        Arc::make_mut(&mut scene.models[0].mesh).indices.push(0);

        let mut raytracer = Raytracer::with_size(4, 4);
        let result = raytracer.start_render(&scene, &RenderParameters::default());

        assert!(matches!(result, Err(RenderError::Scene(_))));
        assert_eq!(raytracer.state(), RenderState::Idle);
    }
}
