//! Where generated artifacts land in a web-platform-tests checkout.

use std::path::{Path, PathBuf};

use mathvarir::VariantName;

#[derive(Debug, Clone)]
pub struct Paths {
    font_dir: PathBuf,
    reftest_dir: PathBuf,
    css_reftest_dir: PathBuf,
}

impl Paths {
    pub fn new(wpt_root: &Path) -> Paths {
        Paths {
            font_dir: wpt_root.join("fonts").join("math"),
            reftest_dir: wpt_root
                .join("mathml")
                .join("relations")
                .join("css-styling"),
            css_reftest_dir: wpt_root
                .join("css")
                .join("css-text")
                .join("text-transform"),
        }
    }

    pub fn font_dir(&self) -> &Path {
        &self.font_dir
    }

    pub fn reftest_dir(&self) -> &Path {
        &self.reftest_dir
    }

    pub fn css_reftest_dir(&self) -> &Path {
        &self.css_reftest_dir
    }

    pub fn font_file(&self, variant: &VariantName) -> PathBuf {
        self.font_dir.join(format!("mathvariant-{variant}.woff"))
    }

    pub fn reftest_file(&self, variant: &VariantName) -> PathBuf {
        self.reftest_dir.join(format!("mathvariant-{variant}.html"))
    }

    pub fn reftest_reference_file(&self, variant: &VariantName) -> PathBuf {
        self.reftest_dir
            .join(format!("mathvariant-{variant}-ref.html"))
    }

    pub fn css_reftest_file(&self, variant: &VariantName) -> PathBuf {
        self.css_reftest_dir
            .join(format!("text-transform-math-{variant}-001.tentative.html"))
    }

    pub fn css_reftest_reference_file(&self, variant: &VariantName) -> PathBuf {
        self.css_reftest_dir
            .join(format!("text-transform-math-{variant}-001.tentative-ref.html"))
    }
}
