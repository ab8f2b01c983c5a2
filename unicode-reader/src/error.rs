use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Error parsing XML: '{0}'")]
    XmlError(#[from] quick_xml::Error),
    #[error("Error parsing XML attribute: '{0}'")]
    XmlAttributeError(#[from] quick_xml::events::attributes::AttrError),
    #[error("the XML input has no <charlist> element")]
    MissingCharlist,
    #[error("Missing required attribute '{missing}' in '{attributes}'")]
    MissingRequiredAttribute {
        attributes: String,
        missing: &'static str,
    },
}

impl ReaderError {
    // a little helper here makes our parsing code cleaner
    pub(crate) fn missing_attr(name: &'static str, raw_attrs: &[u8]) -> Self {
        let attributes = String::from_utf8_lossy(raw_attrs).into_owned();
        Self::MissingRequiredAttribute {
            attributes,
            missing: name,
        }
    }
}
