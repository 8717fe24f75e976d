use crate::soap::envelope::TARGET_NAMESPACE;

/// WSDL 1.1 description of the `publish` operation served at `location`.
pub fn render_wsdl(location: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<wsdl:definitions xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
    xmlns:soap="http://schemas.xmlsoap.org/wsdl/soap/"
    xmlns:xs="http://www.w3.org/2001/XMLSchema"
    xmlns:tns="{tns}"
    targetNamespace="{tns}" name="Application">
  <wsdl:types>
    <xs:schema targetNamespace="{tns}" elementFormDefault="qualified">
      <xs:complexType name="ProcessResponse">
        <xs:sequence>
          <xs:element name="code" type="xs:integer" minOccurs="0" nillable="true"/>
          <xs:element name="result" type="xs:anyType" minOccurs="0" nillable="true"/>
        </xs:sequence>
      </xs:complexType>
      <xs:complexType name="PublishResponse">
        <xs:sequence>
          <xs:element name="response" type="tns:ProcessResponse" minOccurs="0" nillable="true"/>
        </xs:sequence>
      </xs:complexType>
      <xs:complexType name="publish">
        <xs:sequence>
          <xs:element name="message" type="xs:anyType" minOccurs="0" nillable="true"/>
        </xs:sequence>
      </xs:complexType>
      <xs:complexType name="publishResponse">
        <xs:sequence>
          <xs:element name="publishResult" type="tns:PublishResponse" minOccurs="0" nillable="true"/>
        </xs:sequence>
      </xs:complexType>
      <xs:element name="publish" type="tns:publish"/>
      <xs:element name="publishResponse" type="tns:publishResponse"/>
    </xs:schema>
  </wsdl:types>
  <wsdl:message name="publish">
    <wsdl:part name="publish" element="tns:publish"/>
  </wsdl:message>
  <wsdl:message name="publishResponse">
    <wsdl:part name="publishResponse" element="tns:publishResponse"/>
  </wsdl:message>
  <wsdl:portType name="Application">
    <wsdl:operation name="publish" parameterOrder="publish">
      <wsdl:input name="publish" message="tns:publish"/>
      <wsdl:output name="publishResponse" message="tns:publishResponse"/>
    </wsdl:operation>
  </wsdl:portType>
  <wsdl:binding name="Application" type="tns:Application">
    <soap:binding style="document" transport="http://schemas.xmlsoap.org/soap/http"/>
    <wsdl:operation name="publish">
      <soap:operation soapAction="publish" style="document"/>
      <wsdl:input name="publish"><soap:body use="literal"/></wsdl:input>
      <wsdl:output name="publishResponse"><soap:body use="literal"/></wsdl:output>
    </wsdl:operation>
  </wsdl:binding>
  <wsdl:service name="MQService">
    <wsdl:port name="Application" binding="tns:Application">
      <soap:address location="{location}"/>
    </wsdl:port>
  </wsdl:service>
</wsdl:definitions>
"#,
        tns = TARGET_NAMESPACE,
        location = location,
    )
}
