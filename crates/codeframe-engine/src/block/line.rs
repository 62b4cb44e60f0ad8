use std::rc::Rc;

use crate::annotation::Annotation;

/// One line of a code block together with the annotations attached to it.
///
/// Lines are edited through their [`CodeBlock`](super::CodeBlock) so that the
/// block's processing state can gate every change.
#[derive(Debug, Clone)]
pub struct CodeLine {
    text: String,
    annotations: Vec<Rc<dyn Annotation>>,
}

impl CodeLine {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            annotations: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn annotations(&self) -> &[Rc<dyn Annotation>] {
        &self.annotations
    }

    /// Annotations with the given name, in insertion order.
    pub fn annotations_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Rc<dyn Annotation>> {
        self.annotations.iter().filter(move |a| a.name() == name)
    }

    pub(crate) fn set_text(&mut self, text: String) {
        self.text = text;
    }

    pub(crate) fn push_annotation(&mut self, annotation: Rc<dyn Annotation>) {
        self.annotations.push(annotation);
    }

    /// Removes the given annotation instance. Returns whether it was attached.
    pub(crate) fn remove_annotation(&mut self, annotation: &Rc<dyn Annotation>) -> bool {
        let before = self.annotations.len();
        self.annotations.retain(|a| !Rc::ptr_eq(a, annotation));
        self.annotations.len() != before
    }
}
