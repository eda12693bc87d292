use biene_email_contracts::template::MockTemplateEmailService;
use biene_shared_contracts::time::MockTimeService;

use crate::ContactFeatureServiceImpl;


type Sut = ContactFeatureServiceImpl<MockTimeService, MockTemplateEmailService>;
