// Author: Dustin Pilgrim
// License: MIT
//
// Output filename templates.
//
//   %d dirname      %i file stem    %e extension
//   %x %y %w %h     region in source pixels
//   %f frame number %r rotation (whole degrees)
//   %. shear x      %, shear y
//
// Each placeholder may carry printf-style flags, width and precision
// between '%' and the key, e.g. "%04x" or "%-8i". "%%" is a literal '%'.
// Unknown keys are copied through unchanged.

pub const DEFAULT_IMGOUT_FORMAT: &str = "%d/imageclipper/%i.%e_%04r_%04x_%04y_%04w_%04h.png";
pub const DEFAULT_VIDOUT_FORMAT: &str = "%d/imageclipper/%i.%e_%04f_%04r_%04x_%04y_%04w_%04h.png";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues {
    pub dirname: String,
    pub stem: String,
    pub extension: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub frame: u64,
    pub rotation: i32,
    pub shear_x: i32,
    pub shear_y: i32,
}

enum Value<'a> {
    Str(&'a str),
    Int(i64),
}

impl TemplateValues {
    fn lookup(&self, key: char) -> Option<Value<'_>> {
        let v = match key {
            'd' => Value::Str(&self.dirname),
            'i' => Value::Str(&self.stem),
            'e' => Value::Str(&self.extension),
            'x' => Value::Int(self.x as i64),
            'y' => Value::Int(self.y as i64),
            'w' => Value::Int(self.width as i64),
            'h' => Value::Int(self.height as i64),
            'f' => Value::Int(self.frame as i64),
            'r' => Value::Int(self.rotation as i64),
            '.' => Value::Int(self.shear_x as i64),
            ',' => Value::Int(self.shear_y as i64),
            _ => return None,
        };
        Some(v)
    }
}

#[derive(Debug, Default)]
struct Conversion {
    left: bool,
    plus: bool,
    space: bool,
    zero: bool,
    width: usize,
    precision: Option<usize>,
}

/// Expands every placeholder in `template`, left to right. Substituted
/// text is never rescanned.
pub fn expand(template: &str, values: &TemplateValues) -> String {
    let mut out = String::with_capacity(template.len() + 32);
    let mut rest = template;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        if let Some(after) = tail.strip_prefix('%') {
            out.push('%');
            rest = after;
            continue;
        }

        let (conv, used) = parse_conversion(tail);
        let mut keys = tail[used..].chars();
        match keys.next().and_then(|k| values.lookup(k).map(|v| (k, v))) {
            Some((key, value)) => {
                out.push_str(&render(&conv, value));
                rest = &tail[used + key.len_utf8()..];
            }
            None => {
                out.push('%');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

fn parse_conversion(s: &str) -> (Conversion, usize) {
    let bytes = s.as_bytes();
    let mut conv = Conversion::default();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'-' => conv.left = true,
            b'+' => conv.plus = true,
            b' ' => conv.space = true,
            b'0' => conv.zero = true,
            b'#' => {}
            _ => break,
        }
        i += 1;
    }

    let (width, n) = parse_number(&bytes[i..]);
    conv.width = width;
    i += n;

    if bytes.get(i) == Some(&b'.') {
        // "%." is the shear-x key, not an empty precision
        let (prec, n) = parse_number(&bytes[i + 1..]);
        if n > 0 {
            conv.precision = Some(prec);
            i += 1 + n;
        }
    }

    (conv, i)
}

fn parse_number(bytes: &[u8]) -> (usize, usize) {
    let n = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let v = bytes[..n]
        .iter()
        .fold(0usize, |acc, b| acc.saturating_mul(10).saturating_add((b - b'0') as usize));
    (v, n)
}

fn render(conv: &Conversion, value: Value<'_>) -> String {
    match value {
        Value::Str(s) => {
            let s: String = match conv.precision {
                Some(p) => s.chars().take(p).collect(),
                None => s.to_string(),
            };
            pad(conv, "", &s, false)
        }
        Value::Int(v) => {
            let sign = if v < 0 {
                "-"
            } else if conv.plus {
                "+"
            } else if conv.space {
                " "
            } else {
                ""
            };
            let mut digits = v.unsigned_abs().to_string();
            if let Some(p) = conv.precision {
                if p == 0 && v == 0 {
                    digits.clear();
                } else if digits.len() < p {
                    digits.insert_str(0, &"0".repeat(p - digits.len()));
                }
            }
            // C ignores the zero flag once a precision is given
            let zero = conv.zero && !conv.left && conv.precision.is_none();
            pad(conv, sign, &digits, zero)
        }
    }
}

fn pad(conv: &Conversion, sign: &str, body: &str, zero: bool) -> String {
    let len = sign.len() + body.chars().count();
    let fill = conv.width.saturating_sub(len);
    if fill == 0 {
        return format!("{sign}{body}");
    }
    if conv.left {
        format!("{sign}{body}{}", " ".repeat(fill))
    } else if zero {
        format!("{sign}{}{body}", "0".repeat(fill))
    } else {
        format!("{}{sign}{body}", " ".repeat(fill))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat() -> TemplateValues {
        TemplateValues {
            dirname: "/tmp".into(),
            stem: "cat".into(),
            extension: "jpg".into(),
            x: 5,
            y: 10,
            width: 20,
            height: 30,
            ..TemplateValues::default()
        }
    }

    #[test]
    fn default_image_template() {
        assert_eq!(
            expand(DEFAULT_IMGOUT_FORMAT, &cat()),
            "/tmp/imageclipper/cat.jpg_0000_0005_0010_0020_0030.png"
        );
    }

    #[test]
    fn default_video_template() {
        let v = TemplateValues {
            dirname: "/v".into(),
            stem: "clip".into(),
            extension: "avi".into(),
            frame: 12,
            rotation: 90,
            ..cat()
        };
        assert_eq!(
            expand(DEFAULT_VIDOUT_FORMAT, &v),
            "/v/imageclipper/clip.avi_0012_0090_0005_0010_0020_0030.png"
        );
    }

    #[test]
    fn negative_and_shear_values() {
        let v = TemplateValues {
            x: -3,
            shear_x: 2,
            shear_y: -1,
            ..cat()
        };
        assert_eq!(expand("%04x|%.|%,|%+q", &v), "-003|2|-1|%+q");
    }

    #[test]
    fn flags_width_precision() {
        let v = cat();
        assert_eq!(expand("[%-5i]", &v), "[cat  ]");
        assert_eq!(expand("[%5i]", &v), "[  cat]");
        assert_eq!(expand("[%.2i]", &v), "[ca]");
        assert_eq!(expand("[%+x]", &v), "[+5]");
        assert_eq!(expand("[%6.3w]", &v), "[   020]");
        assert_eq!(expand("[%-04h]", &v), "[30  ]");
    }

    #[test]
    fn literal_percent_and_unknown_keys() {
        assert_eq!(expand("100%% %q %", &cat()), "100% %q %");
    }

    #[test]
    fn substituted_text_is_not_rescanned() {
        let v = TemplateValues {
            stem: "%x".into(),
            ..cat()
        };
        assert_eq!(expand("%i-%x", &v), "%x-5");
    }
}
