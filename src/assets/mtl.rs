//! Wavefront MTL parsing.
//!
//! Parses the subset of MTL used by the mesh pipeline: Phong color terms,
//! opacity (both `d` and its inverse `Tr` spelling), illumination model, and
//! the diffuse texture map. Unknown statements are ignored; malformed ones
//! are logged and skipped so a bad line costs one property, not the whole
//! library. Statements before the first `newmtl` have nothing to apply to
//! and are skipped.

use log::{debug, warn};

use crate::foundation::math::{Vec3, Vec4};

/// One parsed material definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MtlMaterial {
    /// The `newmtl` name.
    pub name: String,
    /// `Ka`.
    pub ambient: Vec3,
    /// `Kd`.
    pub diffuse: Vec3,
    /// `Ks`.
    pub specular: Vec3,
    /// `Ke`.
    pub emissive: Vec3,
    /// `Ns`.
    pub shininess: f32,
    /// `Ni`, index of refraction.
    pub optical_density: f32,
    /// `d` (or `1 - Tr`), 1.0 is opaque.
    pub alpha: f32,
    /// `illum` model number.
    pub illum: i32,
    /// `map_Kd` path, relative to the MTL file.
    pub diffuse_map: Option<String>,
}

impl MtlMaterial {
    fn named(name: String) -> Self {
        Self {
            name,
            ambient: Vec3::zeros(),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::zeros(),
            emissive: Vec3::zeros(),
            shininess: 0.0,
            optical_density: 1.0,
            alpha: 1.0,
            illum: 2,
            diffuse_map: None,
        }
    }

    /// Diffuse color and opacity as the mesh pipeline's base color.
    pub fn base_color(&self) -> Vec4 {
        Vec4::new(self.diffuse.x, self.diffuse.y, self.diffuse.z, self.alpha)
    }
}

/// Parse MTL text into material definitions, in declaration order.
pub fn parse(source: &str) -> Vec<MtlMaterial> {
    let mut materials: Vec<MtlMaterial> = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split_whitespace();
        let keyword = fields.next().unwrap_or("");
        let rest: Vec<&str> = fields.collect();

        if keyword == "newmtl" {
            match rest.first() {
                Some(name) => materials.push(MtlMaterial::named((*name).to_string())),
                None => warn!("mtl line {line_no}: newmtl without a name"),
            }
            continue;
        }
        let Some(current) = materials.last_mut() else {
            warn!("mtl line {line_no}: statement before first newmtl");
            continue;
        };

        let ok = match keyword {
            "Ka" => parse_floats::<3>(&rest).map(|v| current.ambient = Vec3::from(v)),
            "Kd" => parse_floats::<3>(&rest).map(|v| current.diffuse = Vec3::from(v)),
            "Ks" => parse_floats::<3>(&rest).map(|v| current.specular = Vec3::from(v)),
            "Ke" => parse_floats::<3>(&rest).map(|v| current.emissive = Vec3::from(v)),
            "Ns" => parse_floats::<1>(&rest).map(|v| current.shininess = v[0]),
            "Ni" => parse_floats::<1>(&rest).map(|v| current.optical_density = v[0]),
            "d" => parse_floats::<1>(&rest).map(|v| current.alpha = v[0]),
            "Tr" => parse_floats::<1>(&rest).map(|v| current.alpha = 1.0 - v[0]),
            "illum" => rest
                .first()
                .and_then(|f| f.parse().ok())
                .map(|v| current.illum = v),
            "map_Kd" => rest
                .first()
                .map(|path| current.diffuse_map = Some((*path).to_string())),
            _ => Some(()),
        };
        if ok.is_none() {
            warn!("mtl line {line_no}: skipping malformed statement '{line}'");
        }
    }

    debug!("parsed mtl: {} materials", materials.len());
    materials
}

fn parse_floats<const N: usize>(fields: &[&str]) -> Option<[f32; N]> {
    if fields.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().ok()?;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const SAMPLE: &str = "\
# two materials
newmtl shell
Ka 0.1 0.1 0.1
Kd 0.8 0.2 0.2
Ks 0.5 0.5 0.5
Ns 96.0
Ni 1.45
d 0.9
illum 2
map_Kd shell_diffuse.png

newmtl glass
Kd 0.9 0.9 1.0
Tr 0.7
";

    #[test]
    fn parses_materials_in_order() {
        let materials = parse(SAMPLE);
        assert_eq!(materials.len(), 2);

        let shell = &materials[0];
        assert_eq!(shell.name, "shell");
        assert_relative_eq!(shell.diffuse, Vec3::new(0.8, 0.2, 0.2));
        assert_relative_eq!(shell.shininess, 96.0);
        assert_relative_eq!(shell.alpha, 0.9);
        assert_eq!(shell.illum, 2);
        assert_eq!(shell.diffuse_map.as_deref(), Some("shell_diffuse.png"));
    }

    #[test]
    fn tr_is_inverse_opacity() {
        let materials = parse(SAMPLE);
        assert_relative_eq!(materials[1].alpha, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn base_color_combines_diffuse_and_alpha() {
        let materials = parse(SAMPLE);
        assert_relative_eq!(
            materials[0].base_color(),
            Vec4::new(0.8, 0.2, 0.2, 0.9),
            epsilon = 1e-6
        );
    }

    #[test]
    fn statements_before_newmtl_are_ignored() {
        let materials = parse("Kd 1.0 0.0 0.0\nnewmtl late\n");
        assert_eq!(materials.len(), 1);
        // The stray Kd did not leak into the material's defaults.
        assert_relative_eq!(materials[0].diffuse, Vec3::new(0.8, 0.8, 0.8));
    }

    #[test]
    fn malformed_lines_cost_one_property_not_the_parse() {
        let materials = parse("newmtl m\nKd 1.0 red 0.0\nNs 32.0\n");
        assert_eq!(materials.len(), 1);
        // The bad Kd left the default in place; the Ns after it still landed.
        assert_relative_eq!(materials[0].diffuse, Vec3::new(0.8, 0.8, 0.8));
        assert_relative_eq!(materials[0].shininess, 32.0);
    }
}
