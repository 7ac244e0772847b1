//! Reading a WebDAV PROPFIND response

use xmlnest::parse;

const RESPONSE: &str = r#"<?xml version="1.0" encoding="utf-8" ?>
<D:multistatus xmlns:D="DAV:">
  <D:response>
    <D:href>/docs/report.pdf</D:href>
    <D:propstat>
      <D:prop>
        <D:getcontentlength>48213</D:getcontentlength>
        <D:getlastmodified>Mon, 12 Jan 1998 09:25:56 GMT</D:getlastmodified>
      </D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse(RESPONSE, true)?;
    let Some(root) = doc.root() else {
        return Err("empty response".into());
    };

    for response in root.children() {
        let href = response.child("DAV:href").and_then(|href| href.text());
        println!("{}", href.as_deref().unwrap_or("<no href>"));

        let props = response
            .child("DAV:propstat")
            .and_then(|propstat| propstat.child("DAV:prop"));
        for prop in props.map(|prop| prop.children()).unwrap_or_default() {
            println!("  {} = {}", prop.name(), prop.text().unwrap_or_default());
        }
    }

    println!("{}", doc.to_json(true)?);
    Ok(())
}
