//! Print the OpenAPI document as JSON.

use tenant_customers::ApiDoc;
use utoipa::OpenApi;

#[expect(clippy::print_stdout, reason = "Printing the document is the whole job")]
fn main() -> Result<(), serde_json::Error> {
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
