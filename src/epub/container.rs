use crate::epub::error::{EpubError, Result};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// 容器描述文件在压缩包中的固定路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";

/// 标准包文档的媒体类型
const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: Option<String>,
}

/// Container.xml的解析结果
#[derive(Debug, Clone)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 解析container.xml内容
    ///
    /// 只收集带有`full-path`属性的rootfile，一个都没有时返回
    /// `MissingRootfileDeclaration`。
    ///
    /// # 参数
    /// * `xml_content` - container.xml的原始字节
    ///
    /// # 返回值
    /// * `Result<Container>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &[u8]) -> Result<Container> {
        let mut reader = Reader::from_reader(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.local_name().as_ref() == b"rootfile" => {
                    let mut full_path = None;
                    let mut media_type = None;

                    for attr_result in e.attributes() {
                        let attr = attr_result
                            .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
                        match attr.key.local_name().as_ref() {
                            b"full-path" => {
                                full_path = Some(attr.unescape_value()?.into_owned());
                            }
                            b"media-type" => {
                                media_type = Some(attr.unescape_value()?.into_owned());
                            }
                            _ => {}
                        }
                    }

                    if let Some(full_path) = full_path.filter(|p| !p.is_empty()) {
                        rootfiles.push(RootFile {
                            full_path,
                            media_type,
                        });
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::MissingRootfileDeclaration);
        }

        Ok(Container { rootfiles })
    }

    /// 获取包文档(OPF)路径
    ///
    /// 优先返回媒体类型为`application/oebps-package+xml`的rootfile，
    /// 否则返回第一个rootfile。
    pub fn package_path(&self) -> Option<&str> {
        self.rootfiles
            .iter()
            .find(|rf| rf.media_type.as_deref() == Some(PACKAGE_MEDIA_TYPE))
            .or_else(|| self.rootfiles.first())
            .map(|rf| rf.full_path.as_str())
    }
}
