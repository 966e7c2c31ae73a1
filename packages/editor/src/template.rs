/// Starting point for a new document
pub const NEW_DOCUMENT_TEMPLATE: &str = "\
openapi: 3.0.3
info:
  title: New API
  version: 0.1.0
servers:
  - url: http://localhost:8080
paths: {}
";

#[cfg(test)]
mod tests {
    use super::*;
    use apistudio_linter::validate;

    #[test]
    fn test_template_is_valid() {
        let result = validate(NEW_DOCUMENT_TEMPLATE);
        assert!(result.is_clean(), "{:?}", result.errors);
    }
}
