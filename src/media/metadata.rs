//! # Image Metadata Inspection
//!
//! Lightweight header parsing for manipulation hints: a JPEG with no
//! EXIF segment, generator names embedded in the EXIF payload, and
//! pixel dimensions matching common AI-generator output sizes. These
//! findings are advisory; they attach to the analysis results and never
//! change a verdict on their own.

use super::analysis::{IssueSeverity, MetadataIssue};

/// Output sizes AI generators commonly produce
const AI_DIMENSIONS: [(u32, u32); 4] = [(512, 512), (768, 768), (1024, 1024), (1024, 768)];

/// Generator names worth flagging when found in EXIF software fields
const AI_SOFTWARE_MARKERS: [&str; 3] = ["midjourney", "stable diffusion", "dall-e"];

/// Inspect raw image bytes for metadata-level manipulation hints
pub fn inspect_metadata(bytes: &[u8]) -> Vec<MetadataIssue> {
    let mut issues = Vec::new();

    if is_jpeg(bytes) {
        match exif_payload(bytes) {
            None => issues.push(MetadataIssue {
                kind: "missing_exif".to_string(),
                description: "No EXIF metadata found - may indicate manipulation".to_string(),
                severity: IssueSeverity::Medium,
            }),
            Some(payload) => {
                let lowered = String::from_utf8_lossy(payload).to_lowercase();
                for marker in AI_SOFTWARE_MARKERS {
                    if lowered.contains(marker) {
                        issues.push(MetadataIssue {
                            kind: "ai_software_detected".to_string(),
                            description: format!("AI generation software detected: {}", marker),
                            severity: IssueSeverity::High,
                        });
                    }
                }
            }
        }
    }

    if let Some((width, height)) = image_dimensions(bytes) {
        if AI_DIMENSIONS.contains(&(width, height)) {
            issues.push(MetadataIssue {
                kind: "suspicious_dimensions".to_string(),
                description: format!(
                    "Image size {}x{} matches common AI generation dimensions",
                    width, height
                ),
                severity: IssueSeverity::Low,
            });
        }
    }

    issues
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0xFF && bytes[1] == 0xD8
}

fn is_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]
}

/// The APP1 EXIF payload, if the JPEG carries one
fn exif_payload(bytes: &[u8]) -> Option<&[u8]> {
    for (marker, payload) in JpegSegments::new(bytes) {
        if marker == 0xE1 && payload.starts_with(b"Exif\0\0") {
            return Some(payload);
        }
    }
    None
}

/// Pixel dimensions for JPEG and PNG headers
pub fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if is_png(bytes) {
        // IHDR is the first chunk: length(4) "IHDR" width(4) height(4)
        if bytes.len() >= 24 && &bytes[12..16] == b"IHDR" {
            let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
            let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
            return Some((width, height));
        }
        return None;
    }

    if is_jpeg(bytes) {
        for (marker, payload) in JpegSegments::new(bytes) {
            // SOF0/SOF1/SOF2: precision(1) height(2) width(2)
            if matches!(marker, 0xC0 | 0xC1 | 0xC2) && payload.len() >= 5 {
                let height = u16::from_be_bytes([payload[1], payload[2]]) as u32;
                let width = u16::from_be_bytes([payload[3], payload[4]]) as u32;
                return Some((width, height));
            }
        }
    }

    None
}

/// Walks JPEG marker segments up to start-of-scan
struct JpegSegments<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> JpegSegments<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 2 }
    }
}

impl<'a> Iterator for JpegSegments<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.offset + 4 > self.bytes.len() {
                return None;
            }
            if self.bytes[self.offset] != 0xFF {
                return None;
            }
            let marker = self.bytes[self.offset + 1];
            // Entropy-coded data begins at SOS; nothing structured after
            if marker == 0xDA {
                return None;
            }
            let length =
                u16::from_be_bytes([self.bytes[self.offset + 2], self.bytes[self.offset + 3]])
                    as usize;
            if length < 2 || self.offset + 2 + length > self.bytes.len() {
                return None;
            }
            let payload = &self.bytes[self.offset + 4..self.offset + 2 + length];
            self.offset += 2 + length;
            // Padding markers carry no payload
            if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
                continue;
            }
            return Some((marker, payload));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal JPEG: SOI, optional segments, EOI
    fn jpeg_with_segments(segments: &[(u8, Vec<u8>)]) -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xD8];
        for (marker, payload) in segments {
            bytes.push(0xFF);
            bytes.push(*marker);
            let length = (payload.len() + 2) as u16;
            bytes.extend_from_slice(&length.to_be_bytes());
            bytes.extend_from_slice(payload);
        }
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    fn sof0(width: u16, height: u16) -> (u8, Vec<u8>) {
        let mut payload = vec![8];
        payload.extend_from_slice(&height.to_be_bytes());
        payload.extend_from_slice(&width.to_be_bytes());
        payload.extend_from_slice(&[3]);
        (0xC0, payload)
    }

    fn exif_segment(software: &[u8]) -> (u8, Vec<u8>) {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(software);
        (0xE1, payload)
    }

    fn png_with_dimensions(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.extend_from_slice(&13u32.to_be_bytes());
        bytes.extend_from_slice(b"IHDR");
        bytes.extend_from_slice(&width.to_be_bytes());
        bytes.extend_from_slice(&height.to_be_bytes());
        bytes.extend_from_slice(&[8, 6, 0, 0, 0]);
        bytes
    }

    #[test]
    fn test_jpeg_without_exif_is_flagged() {
        let bytes = jpeg_with_segments(&[sof0(640, 480)]);
        let issues = inspect_metadata(&bytes);
        assert!(issues.iter().any(|issue| issue.kind == "missing_exif"));
    }

    #[test]
    fn test_jpeg_with_exif_is_not_flagged() {
        let bytes = jpeg_with_segments(&[exif_segment(b"NikonCam"), sof0(640, 480)]);
        let issues = inspect_metadata(&bytes);
        assert!(issues.iter().all(|issue| issue.kind != "missing_exif"));
    }

    #[test]
    fn test_generator_name_in_exif_is_flagged_high() {
        let bytes = jpeg_with_segments(&[exif_segment(b"Made with Stable Diffusion 3")]);
        let issues = inspect_metadata(&bytes);
        let issue = issues
            .iter()
            .find(|issue| issue.kind == "ai_software_detected")
            .unwrap();
        assert_eq!(issue.severity, IssueSeverity::High);
    }

    #[test]
    fn test_ai_dimensions_are_flagged_low() {
        let bytes = png_with_dimensions(1024, 1024);
        let issues = inspect_metadata(&bytes);
        let issue = issues
            .iter()
            .find(|issue| issue.kind == "suspicious_dimensions")
            .unwrap();
        assert_eq!(issue.severity, IssueSeverity::Low);
        assert!(issue.description.contains("1024x1024"));
    }

    #[test]
    fn test_ordinary_dimensions_pass() {
        let bytes = png_with_dimensions(4032, 3024);
        let issues = inspect_metadata(&bytes);
        assert!(issues.iter().all(|issue| issue.kind != "suspicious_dimensions"));
    }

    #[test]
    fn test_jpeg_dimensions_parse_from_sof() {
        let bytes = jpeg_with_segments(&[exif_segment(b"cam"), sof0(1024, 768)]);
        assert_eq!(image_dimensions(&bytes), Some((1024, 768)));
    }

    #[test]
    fn test_garbage_bytes_yield_no_issues() {
        assert!(inspect_metadata(b"not an image at all").is_empty());
    }
}
