//! Direct-lighting renderer.
//!
//! One primary ray per pixel, and at most one shadow ray per light. How the
//! lights are combined at a hit is chosen by the [`LightingMode`], which can
//! be cycled at runtime.
//!
//! Pixels are independent: the frame is rendered with a rayon parallel
//! iterator over the frame buffer, each task writing only its own pixel.

use crate::material::Color;
use crate::scene::Scene;
use image::{ImageResult, Rgb, RgbImage};
use prism_math::{Interval, Mat4, Ray, Vec3};
use rayon::prelude::*;
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Lower bound of shadow rays, keeps them from hitting their own surface.
pub const SHADOW_EPSILON: f32 = 0.001;

/// What the renderer accumulates per light at a hit point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LightingMode {
    /// Lambert's cosine term alone, as gray
    ObservedArea,
    /// Incident light radiance, no surface response
    Radiance,
    /// Material response only, no radiance or cosine weighting
    Brdf,
    /// `radiance * brdf * cosine`
    #[default]
    Combined,
}

impl LightingMode {
    /// All modes in cycling order.
    pub const ALL: [LightingMode; 4] = [
        LightingMode::ObservedArea,
        LightingMode::Radiance,
        LightingMode::Brdf,
        LightingMode::Combined,
    ];

    /// The mode after this one, wrapping from `Combined` back to `ObservedArea`.
    pub fn next(self) -> Self {
        match self {
            LightingMode::ObservedArea => LightingMode::Radiance,
            LightingMode::Radiance => LightingMode::Brdf,
            LightingMode::Brdf => LightingMode::Combined,
            LightingMode::Combined => LightingMode::ObservedArea,
        }
    }
}

impl fmt::Display for LightingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LightingMode::ObservedArea => "Observed Area",
            LightingMode::Radiance => "Radiance",
            LightingMode::Brdf => "BRDF",
            LightingMode::Combined => "Combined",
        };
        f.write_str(name)
    }
}

/// Clamp a color to `[0, 1]` per channel and quantize to 8 bits.
///
/// Values above one are clipped, not tone-mapped.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let r = (255.0 * Interval::UNIT.clamp(color.x)) as u8;
    let g = (255.0 * Interval::UNIT.clamp(color.y)) as u8;
    let b = (255.0 * Interval::UNIT.clamp(color.z)) as u8;
    [r, g, b]
}

/// 8-bit RGB output of a render, row-major from the top-left pixel.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    pub width: u32,
    pub height: u32,
    pixels: Vec<[u8; 3]>,
}

impl FrameBuffer {
    /// Create a black frame buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; (width * height) as usize],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[(y * self.width + x) as usize]
    }

    pub fn pixels(&self) -> &[[u8; 3]] {
        &self.pixels
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| Rgb(self.get(x, y)))
    }

    /// Save as an image file; the format follows the extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_rgb_image().save(path)
    }
}

/// Per-frame values shared by every pixel task.
#[derive(Debug, Clone, Copy)]
struct FrameContext {
    width: f32,
    height: f32,
    aspect_ratio: f32,
    fov_scale: f32,
    origin: Vec3,
    camera_to_world: Mat4,
    lighting_mode: LightingMode,
    shadows_enabled: bool,
    background: Color,
}

impl FrameContext {
    /// Trace one pixel and return its clamped color.
    fn render_pixel(&self, scene: &Scene, px: u32, py: u32) -> Color {
        // Raster space to camera space
        let cx = ((2.0 * (px as f32 + 0.5) / self.width - 1.0) * self.aspect_ratio) * self.fov_scale;
        let cy = (1.0 - 2.0 * (py as f32 + 0.5) / self.height) * self.fov_scale;

        let direction = self
            .camera_to_world
            .transform_vector3(Vec3::new(cx, cy, 1.0))
            .normalize();
        let view_ray = Ray::new(self.origin, direction);

        let color = self.shade(scene, &view_ray);
        Color::new(
            Interval::UNIT.clamp(color.x),
            Interval::UNIT.clamp(color.y),
            Interval::UNIT.clamp(color.z),
        )
    }

    fn shade(&self, scene: &Scene, view_ray: &Ray) -> Color {
        let hit = scene.get_closest_hit(view_ray);
        if !hit.did_hit {
            return self.background;
        }

        let material = &scene.materials()[hit.material_index];
        let mut color = Color::ZERO;

        for light in scene.lights() {
            let to_light = light.direction_to_light(hit.point);
            let distance = to_light.length();
            let Some(l) = to_light.try_normalize() else {
                continue;
            };

            if self.shadows_enabled && distance > SHADOW_EPSILON {
                let shadow_ray = Ray::with_bounds(hit.point, l, SHADOW_EPSILON, distance);
                if scene.does_hit(&shadow_ray) {
                    continue;
                }
            }

            match self.lighting_mode {
                LightingMode::ObservedArea => {
                    let observed_area = hit.normal.dot(l);
                    if observed_area <= 0.0 {
                        continue;
                    }
                    color += Color::splat(observed_area);
                }
                LightingMode::Radiance => {
                    color += light.radiance(hit.point);
                }
                LightingMode::Brdf => {
                    color += material.shade(&hit, l, view_ray.direction);
                }
                LightingMode::Combined => {
                    let observed_area = hit.normal.dot(l);
                    if observed_area <= 0.0 {
                        continue;
                    }
                    let brdf = material.shade(&hit, l, view_ray.direction);
                    color += light.radiance(hit.point) * brdf * observed_area;
                }
            }
        }

        color
    }
}

/// Renders a [`Scene`] into its own [`FrameBuffer`].
#[derive(Debug, Clone)]
pub struct Renderer {
    buffer: FrameBuffer,
    lighting_mode: LightingMode,
    shadows_enabled: bool,
    /// Color of pixels whose primary ray hits nothing
    pub background: Color,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: FrameBuffer::new(width, height),
            lighting_mode: LightingMode::default(),
            shadows_enabled: true,
            background: Color::ZERO,
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width
    }

    pub fn height(&self) -> u32 {
        self.buffer.height
    }

    /// Reallocate the frame buffer. Its contents are lost.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.buffer = FrameBuffer::new(width, height);
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn lighting_mode(&self) -> LightingMode {
        self.lighting_mode
    }

    pub fn set_lighting_mode(&mut self, mode: LightingMode) {
        self.lighting_mode = mode;
    }

    /// Advance to the next lighting mode.
    pub fn cycle_lighting_mode(&mut self) {
        self.lighting_mode = self.lighting_mode.next();
        log::info!("Lighting mode: {}", self.lighting_mode);
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    pub fn set_shadows_enabled(&mut self, enabled: bool) {
        self.shadows_enabled = enabled;
    }

    pub fn toggle_shadows(&mut self) {
        self.shadows_enabled = !self.shadows_enabled;
        log::info!("Shadows {}", if self.shadows_enabled { "enabled" } else { "disabled" });
    }

    fn frame_context(&self, scene: &Scene) -> FrameContext {
        let camera = scene.camera();
        let width = self.buffer.width as f32;
        let height = self.buffer.height as f32;

        FrameContext {
            width,
            height,
            aspect_ratio: width / height,
            fov_scale: camera.fov_scale(),
            origin: camera.origin,
            camera_to_world: camera.calculate_camera_to_world(),
            lighting_mode: self.lighting_mode,
            shadows_enabled: self.shadows_enabled,
            background: self.background,
        }
    }

    /// Render every pixel of the frame buffer.
    ///
    /// Returns after all pixels are written.
    pub fn render(&mut self, scene: &Scene) {
        let start = Instant::now();
        let context = self.frame_context(scene);
        let width = self.buffer.width as usize;

        self.buffer
            .pixels
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, pixel)| {
                let px = (index % width) as u32;
                let py = (index / width) as u32;
                *pixel = color_to_rgb8(context.render_pixel(scene, px, py));
            });

        log::debug!(
            "Rendered {}x{} ({}, shadows {}) in {:.2?}",
            self.buffer.width,
            self.buffer.height,
            self.lighting_mode,
            if self.shadows_enabled { "on" } else { "off" },
            start.elapsed()
        );
    }

    /// Compute the clamped color of a single pixel without touching the buffer.
    pub fn render_pixel(&self, scene: &Scene, px: u32, py: u32) -> Color {
        self.frame_context(scene).render_pixel(scene, px, py)
    }

    /// Save the last rendered frame.
    pub fn save_buffer_to_image<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        let path = path.as_ref();
        self.buffer.save(path)?;
        log::info!("Saved frame to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::material::Material;

    /// Sphere straight ahead of a camera at the origin, hit at (0, 0, 4)
    /// with normal -Z, rendered as a single pixel.
    fn sphere_scene() -> Scene {
        let mut scene = Scene::new("sphere");
        scene.set_camera(Camera::new(Vec3::ZERO, 90.0));
        let white = scene.add_material(Material::lambert(Color::ONE, 1.0));
        scene.add_sphere(Vec3::new(0.0, 0.0, 5.0), 1.0, white);
        scene
    }

    fn single_pixel(mode: LightingMode, shadows: bool) -> Renderer {
        let mut renderer = Renderer::new(1, 1);
        renderer.set_lighting_mode(mode);
        renderer.set_shadows_enabled(shadows);
        renderer
    }

    #[test]
    fn test_lighting_mode_cycle() {
        let mut renderer = Renderer::new(1, 1);
        assert_eq!(renderer.lighting_mode(), LightingMode::Combined);

        let mut seen = Vec::new();
        for _ in 0..4 {
            renderer.cycle_lighting_mode();
            seen.push(renderer.lighting_mode());
        }
        assert_eq!(seen, LightingMode::ALL.to_vec());
    }

    #[test]
    fn test_toggle_shadows() {
        let mut renderer = Renderer::new(1, 1);
        assert!(renderer.shadows_enabled());
        renderer.toggle_shadows();
        assert!(!renderer.shadows_enabled());
        renderer.toggle_shadows();
        assert!(renderer.shadows_enabled());
    }

    #[test]
    fn test_color_to_rgb8_clips() {
        assert_eq!(color_to_rgb8(Color::new(1.5, -0.2, 0.5)), [255, 0, 127]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
    }

    #[test]
    fn test_observed_area_is_cosine() {
        let mut scene = sphere_scene();
        // to_light = (0, 3, -4) / 5, so n . l = 0.8
        scene.add_point_light(Vec3::new(0.0, 3.0, 0.0), 1.0, Color::ONE);
        let renderer = single_pixel(LightingMode::ObservedArea, false);

        let color = renderer.render_pixel(&scene, 0, 0);
        assert!((color - Color::splat(0.8)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_observed_area_light_along_normal() {
        let mut scene = sphere_scene();
        scene.add_point_light(Vec3::new(0.0, 0.0, 2.0), 1.0, Color::ONE);
        let renderer = single_pixel(LightingMode::ObservedArea, false);

        let color = renderer.render_pixel(&scene, 0, 0);
        assert!((color - Color::ONE).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_occluded_light_is_skipped() {
        let mut scene = sphere_scene();
        let white = 0;
        // Halfway between the hit point (0, 0, 4) and the light
        scene.add_sphere(Vec3::new(0.0, 2.0, 2.0), 0.5, white);
        scene.add_point_light(Vec3::new(0.0, 4.0, 0.0), 1.0, Color::ONE);

        let lit = single_pixel(LightingMode::ObservedArea, false).render_pixel(&scene, 0, 0);
        let cos = std::f32::consts::FRAC_1_SQRT_2;
        assert!((lit - Color::splat(cos)).length() < 1e-5, "{:?}", lit);

        let shadowed = single_pixel(LightingMode::ObservedArea, true).render_pixel(&scene, 0, 0);
        assert_eq!(shadowed, Color::ZERO);
    }

    #[test]
    fn test_light_behind_surface_contributes_nothing() {
        let mut scene = sphere_scene();
        scene.add_point_light(Vec3::new(0.0, 0.0, 10.0), 1.0, Color::ONE);

        for mode in [LightingMode::ObservedArea, LightingMode::Combined] {
            let color = single_pixel(mode, false).render_pixel(&scene, 0, 0);
            assert_eq!(color, Color::ZERO, "{}", mode);
        }
    }

    #[test]
    fn test_radiance_mode() {
        let mut scene = sphere_scene();
        // Distance 2 from the hit point, intensity 4: radiance = color
        scene.add_point_light(Vec3::new(0.0, 0.0, 2.0), 4.0, Color::new(1.0, 0.5, 0.0));
        let renderer = single_pixel(LightingMode::Radiance, true);

        let color = renderer.render_pixel(&scene, 0, 0);
        assert!((color - Color::new(1.0, 0.5, 0.0)).length() < 1e-5, "{:?}", color);
    }

    #[test]
    fn test_brdf_and_combined_modes() {
        let mut scene = sphere_scene();
        scene.add_point_light(Vec3::new(0.0, 3.0, 0.0), 25.0, Color::ONE);

        let brdf = single_pixel(LightingMode::Brdf, true).render_pixel(&scene, 0, 0);
        assert!((brdf - Color::splat(1.0 / std::f32::consts::PI)).length() < 1e-5);

        // Radiance 25 / 5^2 = 1, cosine 0.8
        let combined = single_pixel(LightingMode::Combined, true).render_pixel(&scene, 0, 0);
        let expected = Color::splat(0.8 / std::f32::consts::PI);
        assert!((combined - expected).length() < 1e-5, "{:?}", combined);
    }

    #[test]
    fn test_miss_renders_background() {
        let scene = Scene::new("empty");
        let mut renderer = Renderer::new(4, 3);
        renderer.background = Color::new(0.0, 0.0, 2.0);

        renderer.render(&scene);
        assert!(renderer.buffer().pixels().iter().all(|p| *p == [0, 0, 255]));
    }

    #[test]
    fn test_render_matches_render_pixel() {
        let mut scene = sphere_scene();
        let floor = scene.add_material(Material::lambert(Color::new(0.8, 0.4, 0.2), 1.0));
        scene.add_plane(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, floor);
        scene.add_point_light(Vec3::new(0.0, 5.0, 2.0), 40.0, Color::ONE);
        scene.add_directional_light(Vec3::new(0.3, -1.0, 0.5), 0.5, Color::ONE);

        let mut renderer = Renderer::new(16, 9);
        renderer.render(&scene);

        for y in 0..9 {
            for x in 0..16 {
                let expected = color_to_rgb8(renderer.render_pixel(&scene, x, y));
                assert_eq!(renderer.buffer().get(x, y), expected, "pixel ({}, {})", x, y);
            }
        }
        // The sphere sits in the middle of the frame
        assert_ne!(renderer.buffer().get(8, 4), [0, 0, 0]);
    }

    #[test]
    fn test_frame_buffer_to_image() {
        let mut renderer = Renderer::new(3, 2);
        renderer.background = Color::new(1.0, 0.0, 0.0);
        renderer.render(&Scene::new("empty"));

        let image = renderer.buffer().to_rgb_image();
        assert_eq!(image.dimensions(), (3, 2));
        assert_eq!(image.get_pixel(2, 1).0, [255, 0, 0]);
    }

    #[test]
    fn test_save_buffer_to_image() {
        let path = std::env::temp_dir().join("prism_renderer_save_test.png");
        let mut renderer = Renderer::new(2, 2);
        renderer.render(&Scene::new("empty"));

        renderer.save_buffer_to_image(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (2, 2));
        let _ = std::fs::remove_file(&path);
    }
}
